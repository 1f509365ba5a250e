use regmap_model::{ParameterRecord, View};

use crate::issue::Issue;

pub fn check(records: &[ParameterRecord]) -> Vec<Issue> {
    let names: Vec<String> = records
        .iter()
        .filter(|r| r.view == View::Primary)
        .map(|r| r.name.clone())
        .collect();
    if names.len() > 1 {
        vec![Issue::MultiplePrimary { names }]
    } else {
        Vec::new()
    }
}
