//! ALARM records carry no write code.

use regmap_model::{ParameterRecord, SystemCategory};

use crate::issue::Issue;

pub fn check(records: &[ParameterRecord]) -> Vec<Issue> {
    records
        .iter()
        .filter(|r| r.system_category == SystemCategory::Alarm && r.write != 0)
        .map(|r| Issue::AlarmWritable {
            id: r.id,
            name: r.name.clone(),
            write: r.write,
        })
        .collect()
}
