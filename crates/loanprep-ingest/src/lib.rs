//! Loan dataset ingestion utilities.
//!
//! This crate reads the combined loan-application CSV in bounded-memory
//! batches and writes engineered batches to a single output CSV.
//!
//! # Features
//!
//! - **Batch Reading**: Stream the source in fixed-size batches of all-string
//!   columns, optionally skipping leading data records
//! - **Sampling**: Read the first N records as one batch for schema resolution
//! - **Header Normalization**: Trim and lower-case source column names
//! - **Output Sink**: Write the header once, then append rows of a fixed width
//!
//! # Example
//!
//! ```ignore
//! use loanprep_ingest::{BatchReader, CsvSink, StreamingOptions, read_sample};
//!
//! let options = StreamingOptions::default().with_sample_size(1000);
//! let sample = read_sample(&input, &options)?;
//!
//! let mut reader = BatchReader::open(&input, &options)?;
//! reader.skip_records(options.sample_size)?;
//! while let Some(batch) = reader.next_batch()? {
//!     // engineer and append
//! }
//! ```

mod error;
mod options;
mod sink;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === Options ===
pub use options::{DEFAULT_CHUNK_SIZE, DEFAULT_SAMPLE_SIZE, StreamingOptions};

// === CSV Reading ===
pub use source::{BatchReader, SourceHeaders, is_missing_token, read_sample};

// === CSV Writing ===
pub use sink::CsvSink;
