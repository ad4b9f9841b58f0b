//! CSV source reading: header normalization and batched records.

mod batch;
mod header;

pub use batch::{BatchReader, is_missing_token, read_sample};
pub use header::SourceHeaders;
