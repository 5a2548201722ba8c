//! Error types for artifact output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure writing one artifact. The caller records it and moves on.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write CSV to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize JSON to {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OutputError {
    /// Path of the directory or file that failed.
    pub fn path(&self) -> &PathBuf {
        match self {
            OutputError::CreateDir { path, .. }
            | OutputError::Write { path, .. }
            | OutputError::Csv { path, .. }
            | OutputError::Json { path, .. } => path,
        }
    }
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
