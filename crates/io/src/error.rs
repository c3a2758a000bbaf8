//! Error types for kcs-io.

use std::path::PathBuf;

use kcs_segments::SegmentsError;

/// Error type for all fallible operations in the kcs-io crate.
///
/// Covers missing files, Parquet and Arrow failures, schema and content
/// validation problems, and segment-table construction errors.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries, or
    /// from file creation.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Segment table construction error.
    #[error(transparent)]
    Segments(#[from] SegmentsError),
}

impl IoError {
    pub(crate) fn validation(details: impl Into<String>) -> Self {
        IoError::Validation {
            count: 1,
            details: details.into(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}
