//! Chunked feature-engineering pipeline.
//!
//! The pipeline runs these stages in order:
//! 1. **Sample**: Read the leading records, engineer them, fix the schema
//! 2. **Open output**: Write the header and the engineered sample
//! 3. **Batches**: Engineer each remaining batch, reconcile it onto the
//!    schema and append it
//!
//! Only one batch is resident at a time. Any error aborts the run and leaves
//! a partial output file that must not be used.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use loanprep_features::{ResolvedSchema, engineer_features, resolve_schema};
use loanprep_ingest::{BatchReader, CsvSink, IngestError, StreamingOptions, read_sample};

/// Default source path.
pub const DEFAULT_INPUT: &str = "data/processed/combined_loan_data_processed.csv";

/// Default output path.
pub const DEFAULT_OUTPUT: &str = "data/processed/engineered_loan_dataset.csv";

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Source CSV with a header row.
    pub input: PathBuf,
    /// Output CSV; created or truncated.
    pub output: PathBuf,
    /// Sample size, batch size and delimiter.
    #[serde(flatten)]
    pub streaming: StreamingOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            streaming: StreamingOptions::default(),
        }
    }
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            streaming: StreamingOptions::default(),
        }
    }

    #[must_use]
    pub fn with_streaming(mut self, streaming: StreamingOptions) -> Self {
        self.streaming = streaming;
        self
    }

    /// Load options from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }
}

/// Totals for one completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Number of output columns.
    pub schema_columns: usize,
    pub sample_rows_read: usize,
    pub sample_rows_kept: usize,
    /// Post-sample batches that reached the output.
    pub batches_processed: usize,
    /// Post-sample batches with no recognized labels.
    pub batches_skipped: usize,
    /// Source records read, sample included.
    pub raw_rows: usize,
    pub rows_written: usize,
    /// Rows removed by the label filter, sample included.
    pub rows_dropped: usize,
    /// Batch columns discarded because the schema lacks them.
    pub drifted_columns: BTreeSet<String>,
    /// Schema columns zero-filled in at least one batch.
    pub zero_filled_columns: BTreeSet<String>,
    pub elapsed: Duration,
}

/// Run the whole pipeline from `options.input` to `options.output`.
///
/// The input is checked before the output is touched, so a missing source
/// never truncates an existing output.
pub fn run_pipeline(options: &PipelineOptions) -> Result<PipelineReport> {
    let span = info_span!("pipeline", input = %options.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    options
        .streaming
        .validate()
        .context("invalid pipeline options")?;
    if !options.input.exists() {
        return Err(IngestError::FileNotFound {
            path: options.input.clone(),
        }
        .into());
    }
    info!(
        input = %options.input.display(),
        output = %options.output.display(),
        sample_size = options.streaming.sample_size,
        chunk_size = options.streaming.chunk_size,
        "configuration"
    );

    // Stage 1: sample and schema
    let raw_sample = read_sample(&options.input, &options.streaming).context("read sample")?;
    let ResolvedSchema { sample, schema } =
        resolve_schema(&raw_sample).context("resolve schema")?;

    // Stage 2: header and sample
    let mut sink = CsvSink::create(&options.output, schema.columns())
        .with_context(|| format!("create output {}", options.output.display()))?;
    sink.append(&sample).context("write sample")?;
    info!(
        rows_read = raw_sample.height(),
        rows_kept = sample.height(),
        columns = schema.len(),
        "sample processed"
    );

    let mut report = PipelineReport {
        input: options.input.clone(),
        output: options.output.clone(),
        schema_columns: schema.len(),
        sample_rows_read: raw_sample.height(),
        sample_rows_kept: sample.height(),
        batches_processed: 0,
        batches_skipped: 0,
        raw_rows: raw_sample.height(),
        rows_written: 0,
        rows_dropped: raw_sample.height() - sample.height(),
        drifted_columns: BTreeSet::new(),
        zero_filled_columns: BTreeSet::new(),
        elapsed: Duration::ZERO,
    };
    drop(raw_sample);
    drop(sample);

    // Stage 3: remaining batches
    let mut reader = BatchReader::open(&options.input, &options.streaming)
        .context("open source for batches")?;
    let skipped = reader
        .skip_records(options.streaming.sample_size)
        .context("skip sample records")?;
    debug!(skipped, "positioned after sample");

    for (index, batch) in reader.enumerate() {
        let batch_number = index + 1;
        let raw = batch.with_context(|| format!("read batch {batch_number}"))?;
        let engineered =
            engineer_features(&raw).with_context(|| format!("engineer batch {batch_number}"))?;
        report.raw_rows += raw.height();
        report.rows_dropped += raw.height() - engineered.height();

        if engineered.height() == 0 {
            report.batches_skipped += 1;
            info!(
                batch = batch_number,
                rows = raw.height(),
                "batch has no recognized labels, skipped"
            );
            continue;
        }

        let reconciled = schema
            .reconcile(&engineered)
            .with_context(|| format!("reconcile batch {batch_number}"))?;
        let written = sink
            .append(&reconciled.frame)
            .with_context(|| format!("append batch {batch_number}"))?;
        report.batches_processed += 1;
        report.drifted_columns.extend(reconciled.dropped);
        report.zero_filled_columns.extend(reconciled.zero_filled);
        info!(
            batch = batch_number,
            rows = written,
            total_rows = sink.rows_written(),
            "batch appended"
        );
    }

    report.rows_written = sink.finish().context("flush output")?;
    report.elapsed = start.elapsed();
    info!(
        rows_written = report.rows_written,
        rows_dropped = report.rows_dropped,
        batches = report.batches_processed,
        skipped_batches = report.batches_skipped,
        drifted_columns = report.drifted_columns.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "pipeline complete"
    );
    Ok(report)
}
