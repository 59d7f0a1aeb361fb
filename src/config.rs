//! Configuration management and validation.
//!
//! Settings come from built-in defaults, an optional TOML file and CLI
//! flags, in increasing order of precedence:
//!
//! ```toml
//! [processing]
//! error_policy = "report"
//! species_keys = "lenient"
//! progress = false
//! ```

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{ConverterError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to do with an input line that cannot be turned into a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the run on the first bad line
    #[default]
    FailFast,
    /// Log the bad line with its number, skip it and keep going
    Report,
}

/// Handling of sample attributes whose key has no accession
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesKeyPolicy {
    /// Treat the attribute as a record error
    #[default]
    Strict,
    /// Treat the attribute as not describing species
    Lenient,
}

/// Settings for a single conversion run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub error_policy: ErrorPolicy,

    pub species_keys: SpeciesKeyPolicy,

    /// Show a spinner on stderr while rows are written
    pub progress: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::FailFast,
            species_keys: SpeciesKeyPolicy::Strict,
            progress: true,
        }
    }
}

/// Root of the TOML config file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    processing: ConverterConfig,
}

impl ConverterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConverterError::io(path, e))?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| {
            ConverterError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded config from {}: {:?}", path.display(), file.processing);
        Ok(file.processing)
    }

    /// Default config file location, e.g. ~/.config/missing-annotations/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load an explicit file, else the default file if it exists, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConverterError::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Skip and report bad lines instead of aborting
    pub fn with_error_reporting(mut self) -> Self {
        self.error_policy = ErrorPolicy::Report;
        self
    }

    /// Skip keyless sample attributes instead of failing
    pub fn with_lenient_species_keys(mut self) -> Self {
        self.species_keys = SpeciesKeyPolicy::Lenient;
        self
    }

    /// Disable the progress spinner
    pub fn without_progress(mut self) -> Self {
        self.progress = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_fail_fast_and_strict() {
        let config = ConverterConfig::default();
        assert_eq!(config.error_policy, ErrorPolicy::FailFast);
        assert_eq!(config.species_keys, SpeciesKeyPolicy::Strict);
        assert!(config.progress);
    }

    #[test]
    fn test_parse_full_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [processing]
            error_policy = "report"
            species_keys = "lenient"
            progress = false
            "#,
        )
        .unwrap();

        let config = ConverterConfig::from_file(&path).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Report);
        assert_eq!(config.species_keys, SpeciesKeyPolicy::Lenient);
        assert!(!config.progress);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[processing]\nprogress = false\n").unwrap();

        let config = ConverterConfig::from_file(&path).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::FailFast);
        assert!(!config.progress);
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[processing]\nerror_policy = \"ignore\"\n").unwrap();

        match ConverterConfig::from_file(&path) {
            Err(ConverterError::ConfigParse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let result = ConverterConfig::load(Some(&path));
        assert!(matches!(result, Err(ConverterError::Configuration { .. })));
    }

    #[test]
    fn test_builders() {
        let config = ConverterConfig::default()
            .with_error_reporting()
            .with_lenient_species_keys()
            .without_progress();
        assert_eq!(config.error_policy, ErrorPolicy::Report);
        assert_eq!(config.species_keys, SpeciesKeyPolicy::Lenient);
        assert!(!config.progress);
    }
}
