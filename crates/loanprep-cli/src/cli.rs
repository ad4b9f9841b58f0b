//! CLI argument definitions for the loan feature pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "loanprep",
    version,
    about = "Loan feature engineering - turn combined loan applications into a model-ready CSV",
    long_about = "Engineer model-ready features from the combined accepted/rejected loan dataset.\n\n\
                  The output schema is fixed from a leading sample of the source; the rest of\n\
                  the file is processed in bounded-size batches reconciled onto that schema."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Engineer the whole source file into the output CSV.
    Run(RunArgs),

    /// Resolve and print the output schema without writing anything.
    Schema(SourceArgs),
}

/// Source options shared by every command.
///
/// Flags left unset fall back to the config file, then to the defaults.
#[derive(Args)]
pub struct SourceArgs {
    /// JSON file with pipeline options; explicit flags override it.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source CSV [default: data/processed/combined_loan_data_processed.csv].
    #[arg(long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Leading records used to fix the output schema [default: 500000].
    #[arg(long = "sample-rows", value_name = "N")]
    pub sample_rows: Option<usize>,

    /// Source field delimiter [default: ,].
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output CSV [default: data/processed/engineered_loan_dataset.csv].
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Records per batch after the sample [default: 100000].
    #[arg(long = "chunk-size", value_name = "N")]
    pub chunk_size: Option<usize>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
