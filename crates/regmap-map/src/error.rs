//! Error types for header resolution.

use thiserror::Error;

use regmap_model::{Provenance, Warning};

/// A table the resolver could not turn into labeled rows.
///
/// Both variants are local: the table is dropped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{table}: no header row found")]
    HeaderNotFound { table: Provenance },
    #[error("{table}: no data rows after the header")]
    NoDataRows { table: Provenance },
}

impl ResolveError {
    pub fn table(&self) -> &Provenance {
        match self {
            Self::HeaderNotFound { table } | Self::NoDataRows { table } => table,
        }
    }

    pub fn into_warning(self) -> Warning {
        match self {
            Self::HeaderNotFound { table } => Warning::HeaderNotFound { table },
            Self::NoDataRows { table } => {
                Warning::table_skipped(table, "no data rows after the header")
            }
        }
    }
}
