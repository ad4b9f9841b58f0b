//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! All pipeline progress is reported through `tracing` events inside a
//! `pipeline` span.
//!
//! # Log Levels
//!
//! - `error`: Fatal errors
//! - `warn`: Suspicious input (duplicate headers)
//! - `info`: Pipeline phases, per-batch progress, final totals
//! - `debug`: Per-batch engineering counts, schema drift
//! - `trace`: Unused
//!
//! # Usage
//!
//! ```ignore
//! use loanprep_cli::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::default().with_format(LogFormat::Json);
//! init_logging(&config)?;
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level; everything else stays at warn.
const WORKSPACE_TARGETS: &[&str] = &[
    "loanprep",
    "loanprep_cli",
    "loanprep_common",
    "loanprep_features",
    "loanprep_ingest",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level for workspace crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may replace the configured filter.
    pub use_env_filter: bool,
    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Whether to report span close events (JSON format only).
    pub with_spans: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Optional log file path. When set, logs are appended to the file.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::INFO,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Set the level filter directly.
    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }

    /// Set output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log file path (writes to stderr when None).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Filter directives for the configured level.
    pub fn filter_directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        let mut directives = vec!["warn".to_string()];
        directives.extend(
            WORKSPACE_TARGETS
                .iter()
                .map(|target| format!("{target}={level}")),
        );
        directives.join(",")
    }
}

/// Install the global subscriber, writing to `config.log_file` or stderr.
///
/// Call once at startup; a second call panics.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => init_logging_with_writer(config, LogFile::open(path)?),
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Install the global subscriber with an arbitrary writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(build_env_filter(config));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);

    match config.format {
        LogFormat::Json => {
            let span_events = if config.with_spans {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };
            registry
                .with(layer.json().with_span_events(span_events))
                .init();
        }
        LogFormat::Compact => {
            let layer = layer.compact().with_ansi(config.with_ansi);
            if config.with_timestamps {
                registry.with(layer).init();
            } else {
                registry.with(layer.without_time()).init();
            }
        }
        LogFormat::Pretty => {
            let layer = layer.with_ansi(config.with_ansi);
            if config.with_timestamps {
                registry.with(layer).init();
            } else {
                registry.with(layer.without_time()).init();
            }
        }
    }
}

/// Append-only log file shared by every event writer.
#[derive(Clone)]
struct LogFile {
    file: Arc<Mutex<File>>,
}

impl LogFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// `RUST_LOG` wins when allowed and set; otherwise workspace crates log at the
/// configured level.
fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let configured = || EnvFilter::new(config.filter_directives());
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| configured())
    } else {
        configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_cover_workspace_crates() {
        let config = LogConfig::default().with_level_filter(LevelFilter::DEBUG);
        let directives = config.filter_directives();
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("loanprep_features=debug"));
        assert!(directives.contains("loanprep_ingest=debug"));
    }

    #[test]
    fn test_off_level() {
        let config = LogConfig::default().with_level_filter(LevelFilter::OFF);
        assert!(config.filter_directives().contains("loanprep_cli=off"));
    }

    #[test]
    fn test_log_file_appends_from_every_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loanprep.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let log = LogFile::open(&path).unwrap();
        log.make_writer().write_all(b"first\n").unwrap();
        let mut second = log.make_writer();
        second.write_all(b"second\n").unwrap();
        second.flush().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "earlier run\nfirst\nsecond\n"
        );
    }

    #[test]
    fn test_log_file_open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LogFile::open(&dir.path().join("missing").join("run.log")).is_err());
    }
}
