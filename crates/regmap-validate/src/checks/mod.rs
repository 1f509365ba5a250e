//! Invariant check modules.
//!
//! Each module checks one invariant over the whole batch.

mod alarm;
mod ids;
mod masks;
mod names;
mod view;

use regmap_model::ParameterRecord;

use crate::issue::InvariantReport;

/// Run all invariant checks on one batch.
pub fn run_all(records: &[ParameterRecord]) -> InvariantReport {
    let mut report = InvariantReport::default();

    // 1. ALARM records are never writable
    for issue in alarm::check(records) {
        report.add(issue);
    }

    // 2. Names are unique
    for issue in names::check(records) {
        report.add(issue);
    }

    // 3. At most one primary view
    for issue in view::check(records) {
        report.add(issue);
    }

    // 4. Ids are dense from 1
    for issue in ids::check(records) {
        report.add(issue);
    }

    // 5. Single-bit masks are present and sequential per sibling group
    for issue in masks::check(records) {
        report.add(issue);
    }

    report
}
