use std::path::PathBuf;

use regmap_model::{ParameterRecord, SourceKind, Warning};
use regmap_validate::InvariantReport;

/// Where the converted records went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug)]
pub struct ConvertResult {
    pub kind: SourceKind,
    pub documents: Vec<PathBuf>,
    pub records: Vec<ParameterRecord>,
    pub warnings: Vec<Warning>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    /// Present only when `--check` was given.
    pub invariants: Option<InvariantReport>,
}

impl ConvertResult {
    pub fn has_invariant_errors(&self) -> bool {
        self.invariants
            .as_ref()
            .is_some_and(InvariantReport::has_errors)
    }
}
