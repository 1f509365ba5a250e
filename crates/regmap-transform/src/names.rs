//! Duplicate-name disambiguation.

use std::collections::BTreeSet;

/// Makes names unique across one batch.
///
/// The first occurrence keeps its name; later ones get `_2`, `_3`... in
/// first-seen order, skipping any suffix that is already a name in the
/// batch. Empty names are left alone.
pub fn disambiguate_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: BTreeSet<String> = names
        .iter()
        .map(|name| name.as_ref().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.is_empty() || seen.insert(name) {
                return name.to_string();
            }
            let mut suffix = 2usize;
            loop {
                let candidate = format!("{name}_{suffix}");
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_occurrence_gets_suffix() {
        assert_eq!(disambiguate_names(&["TEMP", "TEMP"]), vec!["TEMP", "TEMP_2"]);
        assert_eq!(
            disambiguate_names(&["A", "B", "A", "A"]),
            vec!["A", "B", "A_2", "A_3"]
        );
    }

    #[test]
    fn existing_suffixed_names_are_skipped() {
        assert_eq!(
            disambiguate_names(&["TEMP", "TEMP", "TEMP_2"]),
            vec!["TEMP", "TEMP_3", "TEMP_2"]
        );
    }
}
