//! Recoverable, row- or table-scoped problems recorded during conversion.

use std::fmt;

use serde::Serialize;

use crate::{Field, Provenance};

/// A local problem that did not stop the conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No row of the table matched any field family.
    HeaderNotFound { table: Provenance },
    /// The table was dropped for another reason (empty, no data rows).
    TableSkipped { table: Provenance, reason: String },
    /// A cell could not be coerced and was nulled or clamped.
    ValueCoercion {
        table: Provenance,
        row: usize,
        field: Field,
        raw: String,
        reason: String,
    },
}

impl Warning {
    pub fn table_skipped(table: Provenance, reason: impl Into<String>) -> Self {
        Warning::TableSkipped {
            table,
            reason: reason.into(),
        }
    }

    pub fn coercion(
        table: Provenance,
        row: usize,
        field: Field,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Warning::ValueCoercion {
            table,
            row,
            field,
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn table(&self) -> &Provenance {
        match self {
            Warning::HeaderNotFound { table }
            | Warning::TableSkipped { table, .. }
            | Warning::ValueCoercion { table, .. } => table,
        }
    }

    /// Short stable code used in summaries.
    pub fn code(&self) -> &'static str {
        match self {
            Warning::HeaderNotFound { .. } => "header_not_found",
            Warning::TableSkipped { .. } => "table_skipped",
            Warning::ValueCoercion { .. } => "value_coercion",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::HeaderNotFound { table } => write!(f, "{table}: no header row found"),
            Warning::TableSkipped { table, reason } => write!(f, "{table}: skipped, {reason}"),
            Warning::ValueCoercion {
                table,
                row,
                field,
                raw,
                reason,
            } => write!(f, "{table} row {row}: {field} '{raw}' {reason}"),
        }
    }
}
