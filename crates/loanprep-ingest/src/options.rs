//! Options for bounded-memory CSV reading.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Default number of leading records used to fix the output schema.
pub const DEFAULT_SAMPLE_SIZE: usize = 500_000;

/// Default number of records per batch after the sample.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Options for streaming CSV reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingOptions {
    /// Number of leading records read as the schema sample.
    /// Defaults to 500,000.
    pub sample_size: usize,

    /// Number of records per batch for the remainder of the file.
    /// Defaults to 100,000.
    pub chunk_size: usize,

    /// Field delimiter of the source file. Must be a single ASCII character.
    /// Defaults to `,`.
    pub delimiter: char,
}

impl Default for StreamingOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            delimiter: ',',
        }
    }
}

impl StreamingOptions {
    /// Set the sample size used for schema resolution.
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Set the batch size for streaming.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check that sizes are positive and the delimiter fits in one byte.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(IngestError::InvalidOption {
                name: "sample_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.chunk_size == 0 {
            return Err(IngestError::InvalidOption {
                name: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        self.delimiter_byte().map(|_| ())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() && self.delimiter != '"' && self.delimiter != '\n' {
            Ok(self.delimiter as u8)
        } else {
            Err(IngestError::InvalidOption {
                name: "delimiter",
                reason: format!("{:?} is not a usable ASCII delimiter", self.delimiter),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_options_builder() {
        let options = StreamingOptions::default()
            .with_sample_size(1000)
            .with_chunk_size(100)
            .with_delimiter(';');

        assert_eq!(options.sample_size, 1000);
        assert_eq!(options.chunk_size, 100);
        assert_eq!(options.delimiter_byte().unwrap(), b';');
        assert!(options.validate().is_ok());
    }

    #[test]
    fn defaults_match_documented_sizes() {
        let options = StreamingOptions::default();
        assert_eq!(options.sample_size, 500_000);
        assert_eq!(options.chunk_size, 100_000);
        assert_eq!(options.delimiter, ',');
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = StreamingOptions::default()
            .with_chunk_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidOption {
                name: "chunk_size",
                ..
            }
        ));

        let err = StreamingOptions::default()
            .with_sample_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidOption {
                name: "sample_size",
                ..
            }
        ));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let err = StreamingOptions::default()
            .with_delimiter('§')
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidOption {
                name: "delimiter",
                ..
            }
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options: StreamingOptions =
            serde_json::from_str(r#"{"chunk_size": 250}"#).unwrap();
        assert_eq!(options.chunk_size, 250);
        assert_eq!(options.sample_size, DEFAULT_SAMPLE_SIZE);
    }
}
