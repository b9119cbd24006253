//! Error types for snapshot loading, configuration and report generation
//!
//! Per-field data gaps never surface here; they are absorbed as absent values.
//! Only structural problems with whole documents or directories become errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a report operation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed results CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid benchmark configuration: {0}")]
    Config(String),

    #[error("No current snapshot data found in {0}")]
    MissingCurrentData(PathBuf),

    #[error("No snapshot documents found in {0}")]
    NoData(PathBuf),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ReportError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
