//! Error types for allocator log ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a log file.
///
/// Any of these aborts the pipeline for that one file; no partial dataset is
/// returned.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Log file not found.
    #[error("log file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Zero-byte file, or a header with no data rows.
    #[error("log file is empty: {path}")]
    EmptyInput { path: PathBuf },

    /// Malformed delimiter structure.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Header row lacks one of the log columns.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === DataFrame Errors ===
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation. Polars only fails here on content it
    /// cannot read, so this classifies as a parse error.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

/// Coarse classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestErrorKind {
    NotFound,
    EmptyInput,
    Parse,
    Io,
}

impl IngestError {
    pub fn kind(&self) -> IngestErrorKind {
        match self {
            IngestError::FileNotFound { .. } => IngestErrorKind::NotFound,
            IngestError::EmptyInput { .. } => IngestErrorKind::EmptyInput,
            IngestError::CsvParse { .. }
            | IngestError::MissingColumn { .. }
            | IngestError::ColumnNotFound { .. }
            | IngestError::DataFrame { .. } => IngestErrorKind::Parse,
            IngestError::FileRead { .. } => IngestErrorKind::Io,
        }
    }

    /// Maps an `io::Error` raised while opening `path`.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/log.csv"),
        };
        assert_eq!(err.to_string(), "log file not found: /path/to/log.csv");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
        assert_eq!(ingest_err.kind(), IngestErrorKind::Parse);
    }

    #[test]
    fn test_error_kinds() {
        let path = PathBuf::from("log.csv");
        let missing = IngestError::MissingColumn {
            column: "Time".to_string(),
            path: path.clone(),
        };
        assert_eq!(missing.kind(), IngestErrorKind::Parse);

        let denied = IngestError::from_io(
            &path,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(denied.kind(), IngestErrorKind::Io);

        let absent = IngestError::from_io(
            &path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(absent.kind(), IngestErrorKind::NotFound);
    }
}
