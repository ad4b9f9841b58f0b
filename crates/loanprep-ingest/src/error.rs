//! Error types for loan dataset ingestion and output.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the source or writing the output.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source CSV file not found.
    #[error("input CSV not found at: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create, write or flush a file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Failed to parse a CSV record.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to write a CSV record.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    /// The source has no usable header row.
    #[error("could not read a header row from {path}")]
    NoHeader { path: PathBuf },

    /// A batch does not have the width of the output header.
    #[error("batch has {found} columns but the output header has {expected}")]
    WidthMismatch { expected: usize, found: usize },

    // === Configuration Errors ===
    /// Invalid streaming option.
    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
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
