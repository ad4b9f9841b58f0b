//! Append-only CSV output.
//!
//! The header is written exactly once when the sink is created; every later
//! write appends rows that must match the header width.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use polars::prelude::*;

use loanprep_common::any_to_string;

use crate::error::{IngestError, Result};

/// Single-writer CSV sink for engineered batches.
///
/// The file handle is closed when the sink is dropped; [`CsvSink::finish`]
/// flushes buffered rows and reports write errors.
pub struct CsvSink {
    path: PathBuf,
    writer: Writer<BufWriter<File>>,
    header: Vec<String>,
    rows_written: usize,
    row: Vec<String>,
}

impl CsvSink {
    /// Create (or truncate) the output file and write the header row.
    ///
    /// Missing parent directories are created.
    pub fn create(path: impl AsRef<Path>, header: &[String]) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| IngestError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::create(&path).map_err(|source| IngestError::FileWrite {
            path: path.clone(),
            source,
        })?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        if !header.is_empty() {
            writer
                .write_record(header)
                .map_err(|err| write_error(&path, &err))?;
        }
        Ok(Self {
            path,
            writer,
            header: header.to_vec(),
            rows_written: 0,
            row: Vec::with_capacity(header.len()),
        })
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names written as the header.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows appended so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append every row of `df` without a header.
    ///
    /// The frame must have exactly the header's width; column order is taken
    /// as-is. Returns the number of rows appended.
    pub fn append(&mut self, df: &DataFrame) -> Result<usize> {
        if df.width() != self.header.len() {
            return Err(IngestError::WidthMismatch {
                expected: self.header.len(),
                found: df.width(),
            });
        }
        let columns = df.get_columns();
        for idx in 0..df.height() {
            self.row.clear();
            for column in columns {
                self.row.push(any_to_string(column.get(idx)?));
            }
            self.writer
                .write_record(&self.row)
                .map_err(|err| write_error(&self.path, &err))?;
        }
        self.rows_written += df.height();
        Ok(df.height())
    }

    /// Flush buffered output and return the total number of data rows.
    pub fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|source| IngestError::FileWrite {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.rows_written)
    }
}

fn write_error(path: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("loan_amnt".into(), &[Some(1000.0), None]).into_column(),
            Series::new("purpose_car".into(), &[1i32, 0]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut sink = CsvSink::create(&path, &header(&["loan_amnt", "purpose_car"])).unwrap();
        sink.append(&frame()).unwrap();
        sink.append(&frame()).unwrap();
        assert_eq!(sink.finish().unwrap(), 4);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "loan_amnt,purpose_car\n1000,1\n,0\n1000,1\n,0\n"
        );
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::create(&path, &header(&["a", "b", "c"])).unwrap();
        let err = sink.append(&frame()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::WidthMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_empty_frame_appends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::create(&path, &header(&["loan_amnt", "purpose_car"])).unwrap();
        let empty = frame().slice(0, 0);
        assert_eq!(sink.append(&empty).unwrap(), 0);
        assert_eq!(sink.finish().unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "loan_amnt,purpose_car\n");
    }
}
