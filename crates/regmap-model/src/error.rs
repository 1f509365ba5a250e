use thiserror::Error;

use crate::{DocumentId, SourceKind};

/// The document cannot be read as its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{document} is not a valid {kind} document: {reason}")]
pub struct ExtractionError {
    pub document: DocumentId,
    pub kind: SourceKind,
    pub reason: String,
}

impl ExtractionError {
    pub fn new(document: DocumentId, kind: SourceKind, reason: impl Into<String>) -> Self {
        Self {
            document,
            kind,
            reason: reason.into(),
        }
    }
}

/// The canonical schema or a rule table is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("canonical column {column} has no value source")]
    MissingColumn { column: String },
    #[error("record row has {found} cells, expected {expected}")]
    Width { expected: usize, found: usize },
    #[error("no rule profile for {kind}")]
    MissingProfile { kind: SourceKind },
}

/// Terminal failure of one conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("rule tables unavailable: {reason}")]
    Standards { reason: String },
    #[error("{kind} accepts exactly one document, got {count}")]
    DocumentCount { kind: SourceKind, count: usize },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
