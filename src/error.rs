//! Error handling for annotation summary runs.
//!
//! Record-level errors carry the 1-based line number of the offending
//! input line so a failed run can be traced back to the export.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Input line {line} is not valid UTF-8")]
    InvalidEncoding {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Record on line {line} has no accession")]
    MissingAccession { line: usize },

    #[error("Sample attribute {position} without key accession in record {accession} (line {line})")]
    MissingSpeciesKey {
        line: usize,
        position: usize,
        accession: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConverterError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error belongs to a single input line rather than the run.
    ///
    /// Only these may be skipped under the reporting error policy.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. }
                | Self::InvalidEncoding { .. }
                | Self::MissingAccession { .. }
                | Self::MissingSpeciesKey { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
