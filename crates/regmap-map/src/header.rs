//! Header row location and column renaming.

use regmap_model::{Field, RawCell};

use crate::score::{FamilyIndex, best_family};

/// The row promoted to header and the family it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    pub row: usize,
    /// Index into the declared families.
    pub family: usize,
    pub score: usize,
}

/// First row within `scan_rows` that qualifies for some family.
pub fn locate_header(
    rows: &[Vec<RawCell>],
    families: &[FamilyIndex],
    scan_rows: usize,
) -> Option<HeaderMatch> {
    rows.iter().take(scan_rows).enumerate().find_map(|(row, cells)| {
        let texts: Vec<&str> = cells.iter().map(RawCell::as_str).collect();
        best_family(families, &texts).map(|best| HeaderMatch {
            row,
            family: best.family,
            score: best.score,
        })
    })
}

/// Field of each header column; `None` for columns the family does not know.
///
/// When two columns map to the same field the leftmost one keeps it.
pub fn column_fields(family: &FamilyIndex, header: &[RawCell]) -> Vec<Option<Field>> {
    let mut seen: Vec<Field> = Vec::new();
    header
        .iter()
        .map(|cell| {
            let field = family.field_for(cell.as_str())?;
            if seen.contains(&field) {
                return None;
            }
            seen.push(field);
            Some(field)
        })
        .collect()
}
