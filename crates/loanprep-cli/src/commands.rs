use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::DataType;
use tracing::info_span;

use loanprep_cli::pipeline::{PipelineOptions, PipelineReport, run_pipeline};
use loanprep_features::{TARGET_COLUMN, resolve_schema};
use loanprep_ingest::read_sample;

use crate::cli::{RunArgs, SourceArgs};
use crate::summary::apply_table_style;

pub fn run_engineer(args: &RunArgs) -> Result<PipelineReport> {
    let options = run_options(args)?;
    run_pipeline(&options)
}

pub fn run_schema(args: &SourceArgs) -> Result<()> {
    let options = source_options(args)?;
    let span = info_span!("schema", input = %options.input.display());
    let _guard = span.enter();
    options
        .streaming
        .validate()
        .context("invalid pipeline options")?;

    let raw_sample = read_sample(&options.input, &options.streaming).context("read sample")?;
    let resolved = resolve_schema(&raw_sample).context("resolve schema")?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Column", "Kind"]);
    apply_table_style(&mut table);
    for (position, column) in resolved.sample.get_columns().iter().enumerate() {
        let kind = if column.name().as_str() == TARGET_COLUMN {
            "label"
        } else if column.dtype() == &DataType::Float64 {
            "numeric"
        } else {
            "indicator"
        };
        table.add_row(vec![
            (position + 1).to_string(),
            column.name().to_string(),
            kind.to_string(),
        ]);
    }
    println!(
        "Schema from {} of {} sample rows:",
        resolved.sample.height(),
        raw_sample.height()
    );
    println!("{table}");
    Ok(())
}

/// Defaults, then the config file, then explicit flags.
fn source_options(args: &SourceArgs) -> Result<PipelineOptions> {
    let mut options = match &args.config {
        Some(path) => PipelineOptions::from_json_file(path)?,
        None => PipelineOptions::default(),
    };
    if let Some(input) = &args.input {
        options.input.clone_from(input);
    }
    if let Some(sample_rows) = args.sample_rows {
        options.streaming.sample_size = sample_rows;
    }
    if let Some(delimiter) = args.delimiter {
        options.streaming.delimiter = delimiter;
    }
    Ok(options)
}

fn run_options(args: &RunArgs) -> Result<PipelineOptions> {
    let mut options = source_options(&args.source)?;
    if let Some(output) = &args.output {
        options.output.clone_from(output);
    }
    if let Some(chunk_size) = args.chunk_size {
        options.streaming.chunk_size = chunk_size;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Run(args) => args,
            Command::Schema(_) => panic!("expected run command"),
        }
    }

    #[test]
    fn test_defaults_without_flags() {
        let options = run_options(&run_args(&["loanprep", "run"])).unwrap();
        assert_eq!(options, PipelineOptions::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pipeline.json");
        fs::write(
            &config,
            r#"{"input": "from_config.csv", "output": "out.csv", "chunk_size": 10, "sample_size": 20}"#,
        )
        .unwrap();
        let config = config.to_string_lossy().to_string();

        let args = run_args(&[
            "loanprep",
            "run",
            "--config",
            &config,
            "--input",
            "from_flag.csv",
            "--chunk-size",
            "5",
            "--delimiter",
            ";",
        ]);
        let options = run_options(&args).unwrap();
        assert_eq!(options.input, PathBuf::from("from_flag.csv"));
        assert_eq!(options.output, PathBuf::from("out.csv"));
        assert_eq!(options.streaming.chunk_size, 5);
        assert_eq!(options.streaming.sample_size, 20);
        assert_eq!(options.streaming.delimiter, ';');
    }
}
