//! Loan feature engineering crate.
//!
//! Turns raw loan-application batches into model-ready frames and keeps the
//! output column set identical across independently processed batches.
//!
//! # Overview
//!
//! This crate provides:
//! - **Field parsers**: term, employment length, percentages, composite FICO score
//! - **Feature engineering**: label filtering, numeric coercion, per-batch
//!   imputation, one-hot encoding
//! - **Schema resolution**: fix the canonical column order from a sample and
//!   reconcile later batches onto it
//!
//! # Example
//!
//! ```ignore
//! use loanprep_features::{engineer_features, resolve_schema};
//!
//! let resolved = resolve_schema(&raw_sample)?;
//! let engineered = engineer_features(&raw_batch)?;
//! let reconciled = resolved.schema.reconcile(&engineered)?;
//! ```
//!
//! # Design Principles
//!
//! - **Batch-local statistics**: medians and modes come from the batch being
//!   engineered, never from other batches
//! - **Malformed values are missing values**: parsers never fail
//! - **Fixed schema**: column identity is decided once, from the sample

mod columns;
mod encode;
mod engineer;
mod error;
mod impute;
mod schema;

pub mod parsers;

// Column catalogue
pub use columns::{
    CATEGORICAL_FEATURES, EMP_LENGTH_YEARS, FICO_SCORE, NUMERIC_FEATURES, NumericDerivation,
    NumericFeature, TARGET_COLUMN, TERM_MONTHS, UNKNOWN_CATEGORY,
};

// Error type
pub use error::{FeatureError, Result};

// Encoding and imputation
pub use encode::{encode_label, indicator_name, normalize_category, one_hot};
pub use impute::{fill_categorical, fill_numeric, median, most_frequent};

// Engineering
pub use engineer::engineer_features;

// Schema
pub use schema::{CanonicalSchema, Reconciled, ResolvedSchema, resolve_schema};
