//! Name uniqueness.

use std::collections::BTreeMap;

use regmap_model::ParameterRecord;

use crate::issue::Issue;

pub fn check(records: &[ParameterRecord]) -> Vec<Issue> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.name.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, count)| Issue::DuplicateName {
            name: name.to_string(),
            count,
        })
        .collect()
}
