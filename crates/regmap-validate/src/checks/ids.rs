//! Dense id sequence.

use regmap_model::ParameterRecord;

use crate::issue::Issue;

/// Reports the first position whose id breaks the `1, 2, 3...` sequence.
pub fn check(records: &[ParameterRecord]) -> Vec<Issue> {
    records
        .iter()
        .enumerate()
        .find_map(|(position, record)| {
            let expected = u32::try_from(position + 1).unwrap_or(u32::MAX);
            (record.id != expected).then(|| Issue::NonDenseId {
                position,
                id: record.id,
                expected,
            })
        })
        .into_iter()
        .collect()
}
