//! Prior results handling for incremental runs.
//!
//! Every line of the prior CSV is echoed to the output unchanged and its
//! first column is remembered so the new-record phase can skip it.

use super::writer::CsvLineWriter;
use crate::constants::FIELD_SEPARATOR;
use crate::error::{ConverterError, Result};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Accessions already present in the prior CSV
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    accessions: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first column of a prior CSV line
    pub fn insert_line(&mut self, line: &str) {
        self.accessions.insert(exclusion_key(line).to_string());
    }

    pub fn contains(&self, accession: &str) -> bool {
        self.accessions.contains(accession)
    }

    pub fn len(&self) -> usize {
        self.accessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessions.is_empty()
    }
}

/// Text before the first comma, or the whole line when there is none
pub fn exclusion_key(line: &str) -> &str {
    line.split_once(FIELD_SEPARATOR)
        .map_or(line, |(accession, _)| accession)
}

/// Outcome of the copy phase
#[derive(Debug, Default)]
pub struct PriorCopy {
    pub exclusions: ExclusionSet,
    pub rows_copied: usize,
}

/// Copy the prior CSV into `writer` and collect its accessions.
///
/// Returns only after the prior file has been read to the end and closed.
pub async fn copy_prior(path: &Path, file: File, writer: &mut CsvLineWriter) -> Result<PriorCopy> {
    let mut lines = BufReader::new(file).lines();
    let mut copy = PriorCopy::default();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ConverterError::io(path, e))?
    {
        writer.write_line(&line).await?;
        copy.exclusions.insert_line(&line);
        copy.rows_copied += 1;
    }

    debug!(
        "Copied {} prior rows from {} ({} distinct accessions)",
        copy.rows_copied,
        path.display(),
        copy.exclusions.len()
    );

    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exclusion_key() {
        assert_eq!(exclusion_key("PXD001,MS:1,,,,,"), "PXD001");
        assert_eq!(exclusion_key("PXD001"), "PXD001");
        assert_eq!(exclusion_key(",x"), "");
        assert_eq!(exclusion_key(""), "");
    }

    #[test]
    fn test_exclusion_set_membership() {
        let mut set = ExclusionSet::new();
        assert!(set.is_empty());

        set.insert_line("PXD001,MS:1,,,,,");
        set.insert_line("PXD001,other,,,,,");
        set.insert_line("PXD002,,,,,,");

        assert_eq!(set.len(), 2);
        assert!(set.contains("PXD001"));
        assert!(set.contains("PXD002"));
        assert!(!set.contains("PXD00"));
    }

    #[tokio::test]
    async fn test_copy_prior_echoes_lines() {
        let temp_dir = TempDir::new().unwrap();
        let prior_path = temp_dir.path().join("prior.csv");
        let output_path = temp_dir.path().join("out.csv");
        std::fs::write(&prior_path, "ProjectAccession,Instrument\r\nPXD001,MS:1\nPXD002,").unwrap();

        let file = File::open(&prior_path).await.unwrap();
        let mut writer = CsvLineWriter::create(&output_path).await.unwrap();
        let copy = copy_prior(&prior_path, file, &mut writer).await.unwrap();
        writer.finish().await.unwrap();

        assert_eq!(copy.rows_copied, 3);
        assert!(copy.exclusions.contains("PXD001"));
        assert!(copy.exclusions.contains("PXD002"));
        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "ProjectAccession,Instrument\nPXD001,MS:1\nPXD002,\n"
        );
    }
}
