//! Bounded-memory batch reading of the source CSV.
//!
//! Every column is read as nullable text. No type inference happens at read
//! time, so a column mixing numbers and words is never misread; typing is the
//! feature engineer's job.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::options::StreamingOptions;

use super::header::SourceHeaders;

/// Upper bound on per-column preallocation; large batches grow as they fill.
const MAX_PREALLOCATED_ROWS: usize = 8192;

/// Cell values read as missing markers, in addition to blank cells.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true if a raw cell should be treated as a missing value.
pub fn is_missing_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Streams a CSV file as a sequence of fixed-size, all-string DataFrames.
///
/// Only one batch of values is held at a time; the underlying reader keeps a
/// single reusable record buffer.
pub struct BatchReader {
    path: PathBuf,
    reader: Reader<File>,
    headers: SourceHeaders,
    batch_size: usize,
    record: StringRecord,
    records_read: usize,
    exhausted: bool,
}

impl BatchReader {
    /// Open a source file positioned at its first data record.
    ///
    /// Batches hold `options.chunk_size` records.
    pub fn open(path: impl AsRef<Path>, options: &StreamingOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(IngestError::FileNotFound { path });
        }
        options.validate()?;

        let file = File::open(&path).map_err(|source| IngestError::FileRead {
            path: path.clone(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter_byte()?)
            .from_reader(file);

        let raw_headers = reader
            .headers()
            .map_err(|err| read_error(&path, err))?
            .clone();
        if raw_headers.iter().all(|value| value.trim().is_empty()) {
            return Err(IngestError::NoHeader { path });
        }
        let headers = SourceHeaders::from_raw(raw_headers.iter());
        if !headers.duplicates.is_empty() {
            warn!(
                path = %path.display(),
                duplicates = ?headers.duplicates,
                "duplicate column names after normalization; keeping the first of each"
            );
        }

        Ok(Self {
            path,
            reader,
            headers,
            batch_size: options.chunk_size,
            record: StringRecord::new(),
            records_read: 0,
            exhausted: false,
        })
    }

    /// Normalized source headers.
    pub fn headers(&self) -> &SourceHeaders {
        &self.headers
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data records consumed so far, including skipped ones.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Skip up to `count` data records without materializing them.
    ///
    /// The header is never skipped. Returns how many records were skipped,
    /// which is less than `count` only when the file ends first.
    pub fn skip_records(&mut self, count: usize) -> Result<usize> {
        let mut skipped = 0;
        while skipped < count {
            if !self.read_next()? {
                break;
            }
            skipped += 1;
        }
        self.records_read += skipped;
        debug!(path = %self.path.display(), skipped, "skipped leading records");
        Ok(skipped)
    }

    /// Read the next batch, or `None` once the file is exhausted.
    pub fn next_batch(&mut self) -> Result<Option<DataFrame>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut values: Vec<Vec<Option<String>>> = (0..self.headers.len())
            .map(|_| Vec::with_capacity(self.batch_size.min(MAX_PREALLOCATED_ROWS)))
            .collect();
        let mut rows = 0usize;
        while rows < self.batch_size {
            if !self.read_next()? {
                break;
            }
            for (column, &source_idx) in values.iter_mut().zip(&self.headers.indices) {
                let cell = self
                    .record
                    .get(source_idx)
                    .filter(|value| !is_missing_token(value))
                    .map(str::to_string);
                column.push(cell);
            }
            rows += 1;
        }
        self.records_read += rows;

        if rows == 0 {
            return Ok(None);
        }

        let columns: Vec<Column> = self
            .headers
            .columns
            .iter()
            .zip(values)
            .map(|(name, column)| Series::new(name.as_str().into(), column).into_column())
            .collect();
        let df = DataFrame::new(columns)?;
        debug!(
            path = %self.path.display(),
            rows = df.height(),
            columns = df.width(),
            records_read = self.records_read,
            "read batch"
        );
        Ok(Some(df))
    }

    /// An empty batch carrying the source columns.
    pub fn empty_batch(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .columns
            .iter()
            .map(|name| Series::new_empty(name.as_str().into(), &DataType::String).into_column())
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Advance the record buffer; marks the reader exhausted at end of file
    /// or on the first error.
    fn read_next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.exhausted = true;
                Ok(false)
            }
            Err(err) => {
                self.exhausted = true;
                Err(read_error(&self.path, err))
            }
        }
    }
}

impl Iterator for BatchReader {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch().transpose()
    }
}

/// Read the first `options.sample_size` data records as one batch.
///
/// A source with a header but no data yields an empty frame with the source
/// columns, so schema resolution still sees every column name.
pub fn read_sample(path: impl AsRef<Path>, options: &StreamingOptions) -> Result<DataFrame> {
    let mut reader = BatchReader::open(path, options)?.with_batch_size(options.sample_size);
    match reader.next_batch()? {
        Some(df) => Ok(df),
        None => reader.empty_batch(),
    }
}

fn read_error(path: &Path, err: csv::Error) -> IngestError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::CsvParse {
            path: path.to_path_buf(),
            message,
        },
    }
}
