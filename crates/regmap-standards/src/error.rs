#![deny(unsafe_code)]

use std::path::PathBuf;

use regmap_model::{ConvertError, SourceKind};

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML profile {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid profile {origin}: {message}")]
    InvalidProfile { origin: String, message: String },

    #[error("profile {origin} declares kind {found}, expected {expected}")]
    KindMismatch {
        origin: String,
        expected: SourceKind,
        found: SourceKind,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProfile {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl From<StandardsError> for ConvertError {
    fn from(error: StandardsError) -> Self {
        ConvertError::Standards {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
