//! Command-line interface components.

use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::models::RunMode;
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// CLI arguments for the annotation summary
///
/// `missing-annotations <INPUT> <OUTPUT> [<PRIOR_CSV> --incremental]`
#[derive(Parser, Debug, Clone)]
#[command(name = "missing-annotations")]
#[command(
    about = "Summarise a PRIDE project NDJSON export as CSV to flag records missing annotations"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// NDJSON export, one project record per line
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// CSV file to write (replaced if it exists)
    #[arg(value_name = "OUTPUT")]
    pub output_path: PathBuf,

    /// Previously generated CSV whose rows are carried forward
    #[arg(value_name = "PRIOR_CSV")]
    pub prior_path: Option<PathBuf>,

    /// Only process accessions not already present in PRIOR_CSV
    #[arg(short = 'i', long = "incremental")]
    pub incremental: bool,

    /// Path to configuration file (TOML format)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log and skip bad input lines instead of aborting
    #[arg(long = "report-errors")]
    pub report_errors: bool,

    /// Ignore sample attributes whose key has no accession
    #[arg(long = "lenient-species-keys")]
    pub lenient_species_keys: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Validate argument combinations before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.incremental && self.prior_path.is_none() {
            return Err(ConverterError::configuration(
                "--incremental requires a PRIOR_CSV path",
            ));
        }

        if !self.input_path.exists() {
            return Err(ConverterError::configuration(format!(
                "Input file does not exist: {}",
                self.input_path.display()
            )));
        }

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConverterError::configuration(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Run mode implied by the positional prior path and the incremental flag
    pub fn run_mode(&self) -> RunMode {
        match (&self.prior_path, self.incremental) {
            (Some(prior_path), true) => RunMode::Incremental {
                prior_path: prior_path.clone(),
            },
            (Some(prior_path), false) => {
                warn!(
                    "Ignoring {} without --incremental; running in full mode",
                    prior_path.display()
                );
                RunMode::Full
            }
            (None, _) => RunMode::Full,
        }
    }

    /// Layer CLI flags on top of file/default configuration
    pub fn apply_to(&self, mut config: ConverterConfig) -> ConverterConfig {
        if self.report_errors {
            config = config.with_error_reporting();
        }
        if self.lenient_species_keys {
            config = config.with_lenient_species_keys();
        }
        if self.quiet {
            config = config.without_progress();
        }
        config
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ErrorPolicy, SpeciesKeyPolicy};
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["missing-annotations"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_full_mode_arguments() {
        let args = parse(&["projects.json", "summary.csv"]);
        assert_eq!(args.input_path, PathBuf::from("projects.json"));
        assert_eq!(args.output_path, PathBuf::from("summary.csv"));
        assert_eq!(args.run_mode(), RunMode::Full);
    }

    #[test]
    fn test_incremental_long_and_short_flags() {
        for flag in ["--incremental", "-i"] {
            let args = parse(&["projects.json", "summary.csv", "prior.csv", flag]);
            assert_eq!(
                args.run_mode(),
                RunMode::Incremental {
                    prior_path: PathBuf::from("prior.csv")
                }
            );
        }
    }

    #[test]
    fn test_prior_without_flag_is_full_mode() {
        let args = parse(&["projects.json", "summary.csv", "prior.csv"]);
        assert_eq!(args.run_mode(), RunMode::Full);
    }

    #[test]
    fn test_incremental_without_prior_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("projects.json");
        std::fs::write(&input, "").unwrap();

        let args = parse(&[input.to_str().unwrap(), "summary.csv", "-i"]);
        assert!(matches!(
            args.validate(),
            Err(ConverterError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_paths() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("projects.json");
        std::fs::write(&input, "").unwrap();
        let output = temp_dir.path().join("summary.csv");

        let args = parse(&[input.to_str().unwrap(), output.to_str().unwrap()]);
        assert!(args.validate().is_ok());

        let missing = temp_dir.path().join("missing.json");
        let args = parse(&[missing.to_str().unwrap(), output.to_str().unwrap()]);
        assert!(args.validate().is_err());

        let bad_output = temp_dir.path().join("nope").join("summary.csv");
        let args = parse(&[input.to_str().unwrap(), bad_output.to_str().unwrap()]);
        assert!(args.validate().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_accepts_non_regular_input() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("summary.csv");

        let args = parse(&["/dev/null", output.to_str().unwrap()]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "projects.json",
            "summary.csv",
            "--report-errors",
            "--lenient-species-keys",
            "-q",
        ]);
        let config = args.apply_to(ConverterConfig::default());
        assert_eq!(config.error_policy, ErrorPolicy::Report);
        assert_eq!(config.species_keys, SpeciesKeyPolicy::Lenient);
        assert!(!config.progress);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&["a", "b"]).get_log_level(), "warn");
        assert_eq!(parse(&["a", "b", "-vv"]).get_log_level(), "debug");
        assert_eq!(parse(&["a", "b", "-q"]).get_log_level(), "error");
        assert!(Args::try_parse_from(["missing-annotations", "a", "b", "-q", "-v"]).is_err());
    }
}
