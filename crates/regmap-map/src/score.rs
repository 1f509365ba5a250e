//! Field family scoring.
//!
//! A row's score against a family is the number of its cells whose
//! normalized text equals one of the family's known header spellings.
//! The family with the strictly highest score wins; equal scores go to the
//! family declared first, so the choice never depends on map iteration.

use std::collections::BTreeMap;

use regmap_model::Field;
use regmap_standards::FieldFamily;

use crate::utils::normalize_header;

/// Normalized header spelling → field, for one family.
#[derive(Debug, Clone)]
pub struct FamilyIndex {
    pub name: String,
    pub min_matches: usize,
    pub skip_rows_after_header: usize,
    by_spelling: BTreeMap<String, Field>,
}

impl FamilyIndex {
    pub fn new(family: &FieldFamily) -> Self {
        let mut by_spelling = BTreeMap::new();
        for (alias, field) in family.aliases() {
            by_spelling.entry(normalize_header(alias)).or_insert(field);
        }
        Self {
            name: family.name.clone(),
            min_matches: family.min_matches,
            skip_rows_after_header: family.skip_rows_after_header,
            by_spelling,
        }
    }

    /// Field a header cell maps to, if the spelling is known.
    pub fn field_for(&self, header: &str) -> Option<Field> {
        self.by_spelling.get(&normalize_header(header)).copied()
    }

    /// Number of cells matching a known spelling.
    pub fn score<S: AsRef<str>>(&self, cells: &[S]) -> usize {
        cells
            .iter()
            .filter(|cell| self.field_for(cell.as_ref()).is_some())
            .count()
    }
}

/// Winning family of one candidate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyScore {
    /// Index into the declared families.
    pub family: usize,
    pub score: usize,
}

/// Best qualifying family for a row, or `None` when no family reaches its `min_matches`.
pub fn best_family<S: AsRef<str>>(families: &[FamilyIndex], cells: &[S]) -> Option<FamilyScore> {
    let mut best: Option<FamilyScore> = None;
    for (index, family) in families.iter().enumerate() {
        let score = family.score(cells);
        if score < family.min_matches {
            continue;
        }
        if best.is_none_or(|current| score > current.score) {
            best = Some(FamilyScore {
                family: index,
                score,
            });
        }
    }
    best
}
