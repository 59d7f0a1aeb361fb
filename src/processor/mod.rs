//! Main conversion engine.
//!
//! A run moves through at most two phases: copying a prior CSV (incremental
//! mode only) and processing new records. The copy phase is awaited to
//! completion, producing the finished [`ExclusionSet`], before the first
//! input line is read.

pub mod prior;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::prior::{ExclusionSet, PriorCopy, copy_prior};
use self::writer::CsvLineWriter;

use crate::config::{ConverterConfig, ErrorPolicy};
use crate::constants::{CSV_HEADER, PROGRESS_UPDATE_INTERVAL};
use crate::error::{ConverterError, Result};
use crate::extraction::RowFormatter;
use crate::models::{CsvRow, Phase, RunMode, RunStats};

use indicatif::{ProgressBar, ProgressStyle};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Converts an NDJSON project export into the annotation summary CSV
#[derive(Debug)]
pub struct RecordTransformer {
    input_path: PathBuf,
    output_path: PathBuf,
    mode: RunMode,
    config: ConverterConfig,
    formatter: RowFormatter,
}

impl RecordTransformer {
    /// Create a transformer with the default configuration
    pub fn new(input_path: PathBuf, output_path: PathBuf, mode: RunMode) -> Self {
        let config = ConverterConfig::default();
        Self {
            input_path,
            output_path,
            mode,
            formatter: RowFormatter::new(config.species_keys),
            config,
        }
    }

    /// Configure the transformer
    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.formatter = RowFormatter::new(config.species_keys);
        self.config = config;
        self
    }

    pub fn mode(&self) -> &RunMode {
        &self.mode
    }

    /// Run the conversion and return its statistics
    pub async fn run(&self) -> Result<RunStats> {
        let start_time = Instant::now();

        // Open every source before the output is truncated
        let input = open(&self.input_path).await?;
        self.check_not_output(&self.input_path, "Input").await?;
        let prior = match &self.mode {
            RunMode::Incremental { prior_path } => {
                self.check_not_output(prior_path, "Prior CSV").await?;
                Some((prior_path.as_path(), open(prior_path).await?))
            }
            RunMode::Full => None,
        };

        let mut writer = CsvLineWriter::create(&self.output_path).await?;
        let mut stats = RunStats {
            output_path: self.output_path.clone(),
            ..Default::default()
        };

        let exclusions = match prior {
            Some((prior_path, file)) => {
                info!("Phase: {} from {}", Phase::CopyingPrior, prior_path.display());
                let PriorCopy {
                    exclusions,
                    rows_copied,
                } = copy_prior(prior_path, file, &mut writer).await?;
                stats.prior_rows_copied = rows_copied;
                Some(exclusions)
            }
            None => {
                writer.write_line(CSV_HEADER).await?;
                None
            }
        };

        info!(
            "Phase: {} from {}",
            Phase::ProcessingNew,
            self.input_path.display()
        );
        let progress = self.progress_bar();
        self.process_records(input, exclusions.as_ref(), &mut writer, &mut stats, &progress)
            .await?;
        progress.finish_and_clear();

        writer.finish().await?;
        stats.elapsed = start_time.elapsed();

        info!(
            "Wrote {} new rows to {} ({} carried forward, {} excluded, {} skipped)",
            stats.rows_written,
            self.output_path.display(),
            stats.prior_rows_copied,
            stats.records_excluded,
            stats.lines_skipped
        );

        Ok(stats)
    }

    async fn process_records(
        &self,
        input: File,
        exclusions: Option<&ExclusionSet>,
        writer: &mut CsvLineWriter,
        stats: &mut RunStats,
        progress: &ProgressBar,
    ) -> Result<()> {
        let mut lines = BufReader::new(input).lines();
        let mut line_number = 0;

        loop {
            // An undecodable line is consumed whole, so reading can resume after it
            let text = match lines.next_line().await {
                Ok(Some(text)) => Ok(text),
                Ok(None) => break,
                Err(source) if source.kind() == ErrorKind::InvalidData => {
                    Err(ConverterError::InvalidEncoding {
                        line: line_number + 1,
                        source,
                    })
                }
                Err(e) => return Err(ConverterError::io(&self.input_path, e)),
            };
            line_number += 1;
            stats.records_read += 1;

            match text.and_then(|text| self.transform_line(&text, line_number, exclusions)) {
                Ok(Some(row)) => {
                    writer.write_line(&row.to_string()).await?;
                    stats.rows_written += 1;
                    if stats.rows_written as u64 % PROGRESS_UPDATE_INTERVAL == 0 {
                        progress.set_message(format!("{} rows written", stats.rows_written));
                    }
                }
                Ok(None) => {
                    stats.records_excluded += 1;
                }
                Err(e) if e.is_record_level() && self.config.error_policy == ErrorPolicy::Report => {
                    warn!("Skipping line {}: {}", line_number, e);
                    stats.lines_skipped += 1;
                }
                Err(e) => return Err(e),
            }
            progress.tick();
        }

        debug!("Read {} input lines", line_number);
        Ok(())
    }

    /// Parse one input line; `None` when its accession is excluded
    fn transform_line(
        &self,
        text: &str,
        line: usize,
        exclusions: Option<&ExclusionSet>,
    ) -> Result<Option<CsvRow>> {
        let record = self.formatter.parse(text, line)?;
        let accession = record
            .accession
            .as_deref()
            .ok_or(ConverterError::MissingAccession { line })?;

        if exclusions.is_some_and(|set| set.contains(accession)) {
            debug!("Line {}: {} already present, skipping", line, accession);
            return Ok(None);
        }

        self.formatter.format(&record, line).map(Some)
    }

    /// Refuse to truncate a source we are about to read
    async fn check_not_output(&self, source: &Path, role: &str) -> Result<()> {
        if same_file(source, &self.output_path).await {
            return Err(ConverterError::configuration(format!(
                "{} and output are the same file: {}",
                role,
                source.display()
            )));
        }
        Ok(())
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message("Processing records");
        pb
    }
}

/// Compare resolved paths, falling back to the paths as given when either
/// cannot be resolved
async fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

async fn open(path: &Path) -> Result<File> {
    File::open(path)
        .await
        .map_err(|e| ConverterError::io(path, e))
}
