//! Error types for feature engineering.

use thiserror::Error;

/// Errors raised while engineering or reconciling a batch.
///
/// Malformed field values and unrecognized labels are not errors; they become
/// missing values or dropped rows. Only frame-level failures surface here.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for FeatureError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;
