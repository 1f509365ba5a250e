#![deny(unsafe_code)]

//! Post-conversion invariant checks.
//!
//! A converted batch should always pass; [`check`] exists for records that
//! were edited or produced elsewhere, and for the CLI `--check` gate.

mod checks;
pub mod issue;

pub use issue::{InvariantReport, Issue, Severity};

use regmap_model::ParameterRecord;
use tracing::debug;

/// Runs every invariant check over one batch.
pub fn check(records: &[ParameterRecord]) -> InvariantReport {
    let report = checks::run_all(records);
    debug!(
        records = records.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "invariants checked"
    );
    report
}
