use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type for ingestion and storage operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// A single record that failed value-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordViolation {
    /// 1-based position of the record in the submitted list.
    pub record: usize,
    /// Human-readable problems found on this record.
    pub problems: Vec<String>,
}

impl fmt::Display for RecordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.record, self.problems.join(", "))
    }
}

/// Error type returned by every pipeline stage and store backend.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The file name suffix is not one of the recognized encodings.
    #[error("unsupported format: '{file_name}' (expected .csv or .json)")]
    UnsupportedFormat { file_name: String },

    /// The upload could not be read from its source.
    #[error("failed to read upload source: {0}")]
    Source(#[source] std::io::Error),

    /// CSV bytes are not well-formed delimited text.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON bytes do not decode as a canonical record list.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed content violates the expected shape.
    #[error("format error: {message}")]
    Format { message: String },

    /// One or more typed records carry invalid values.
    #[error("format error: {} invalid record(s): {}", .violations.len(), join_violations(.violations))]
    InvalidRecords { violations: Vec<RecordViolation> },

    /// A pipeline stage saw input that an earlier stage should have rejected.
    #[error("internal consistency error: {message}")]
    Internal { message: String },

    /// The requested dataset does not exist.
    #[error("dataset not found: '{name}'")]
    NotFound { name: String },

    /// Persisted state could not be written or read.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl IngestionError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub(crate) fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Classify this error for the request layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Source(_) | Self::Csv(_) | Self::Json(_) => ErrorKind::DecodeError,
            Self::Format { .. } | Self::InvalidRecords { .. } | Self::Internal { .. } => {
                ErrorKind::FormatError
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage { .. } => ErrorKind::StorageError,
        }
    }
}

fn join_violations(violations: &[RecordViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Stable error classification exposed at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The file suffix is neither `.csv` nor `.json`.
    UnsupportedFormat,
    /// The bytes could not be read or parsed as the detected format.
    DecodeError,
    /// Parsed content violates the record layout or value rules.
    FormatError,
    /// No dataset is stored under the requested name.
    NotFound,
    /// The store failed to read or write.
    StorageError,
}

impl ErrorKind {
    /// Stable name used on the wire, e.g. `"FormatError"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::DecodeError => "DecodeError",
            Self::FormatError => "FormatError",
            Self::NotFound => "NotFound",
            Self::StorageError => "StorageError",
        }
    }

    /// HTTP status the request layer answers with for this kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::UnsupportedFormat | Self::DecodeError | Self::FormatError => 400,
            Self::NotFound => 404,
            Self::StorageError => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
