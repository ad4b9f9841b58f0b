//! Shared utilities for the loanprep crates.
//!
//! Holds the Polars `AnyValue` helpers used when reading engineered frames
//! back out as text and when coercing raw text to numbers, plus the column
//! name normalization shared by ingestion and feature engineering.

pub mod names;
pub mod values;

pub use names::normalize_column_name;
pub use values::{any_to_string, any_to_string_non_empty, format_numeric, parse_f64};
