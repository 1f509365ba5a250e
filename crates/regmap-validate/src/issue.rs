//! Issue and report types.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One violated invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Issue {
    #[error("ALARM record {name} (id {id}) has write code {write}")]
    AlarmWritable { id: u32, name: String, write: u8 },
    #[error("name {name} appears {count} times")]
    DuplicateName { name: String, count: usize },
    #[error("{} records have the primary view: {}", .names.len(), .names.join(", "))]
    MultiplePrimary { names: Vec<String> },
    #[error("record at position {position} has id {id}, expected {expected}")]
    NonDenseId {
        position: usize,
        id: u32,
        expected: u32,
    },
    #[error("1bit record {name} (id {id}) has no mask")]
    MissingMask { id: u32, name: String },
    #[error("record {name} (id {id}) has mask {found}, expected {expected} for its sibling position")]
    MaskOutOfOrder {
        id: u32,
        name: String,
        expected: String,
        found: String,
    },
    #[error("record {name} (id {id}) is {length} wide but carries mask {mask}")]
    MaskOnWideRecord {
        id: u32,
        name: String,
        length: String,
        mask: String,
    },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MaskOnWideRecord { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Issue::AlarmWritable { .. } => "alarm_writable",
            Issue::DuplicateName { .. } => "duplicate_name",
            Issue::MultiplePrimary { .. } => "multiple_primary",
            Issue::NonDenseId { .. } => "non_dense_id",
            Issue::MissingMask { .. } => "missing_mask",
            Issue::MaskOutOfOrder { .. } => "mask_out_of_order",
            Issue::MaskOnWideRecord { .. } => "mask_on_wide_record",
        }
    }
}

/// Issues found in one batch, in check order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvariantReport {
    pub issues: Vec<Issue>,
}

impl InvariantReport {
    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
            .count()
    }
}
