//! Core data structures for annotation summaries.
//!
//! Defines the subset of a PRIDE project record that the summary reads,
//! the flattened CSV row, run modes and processing statistics.

use crate::constants::{FIELD_SEPARATOR, SPECIES_ONTOLOGY_CODE};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One project record from the NDJSON export.
///
/// Only the fields used by the summary are modelled; anything else on the
/// line is ignored. A `null` list is treated the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub accession: Option<String>,

    #[serde(default)]
    pub instruments: Option<Vec<CvTerm>>,

    #[serde(default, rename = "quantificationMethods")]
    pub quantification_methods: Option<Vec<CvTerm>>,

    #[serde(default, rename = "softwareList")]
    pub software_list: Option<Vec<CvTerm>>,

    #[serde(default, rename = "ptmList")]
    pub ptm_list: Option<Vec<CvTerm>>,

    #[serde(default)]
    pub sample_attributes: Option<Vec<SampleAttribute>>,

    #[serde(default)]
    pub project_references: Option<Vec<ProjectReference>>,
}

/// Controlled vocabulary reference; only the accession is read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvTerm {
    #[serde(default)]
    pub accession: Option<String>,
}

impl CvTerm {
    pub fn new(accession: impl Into<String>) -> Self {
        Self {
            accession: Some(accession.into()),
        }
    }
}

/// Key/value sample annotation, e.g. organism -> Homo sapiens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleAttribute {
    #[serde(default)]
    pub key: Option<CvTerm>,

    #[serde(default)]
    pub value: Option<Vec<CvTerm>>,
}

impl SampleAttribute {
    /// Key accession, if the key and its accession are both present
    pub fn key_accession(&self) -> Option<&str> {
        self.key.as_ref().and_then(|key| key.accession.as_deref())
    }

    /// Whether this attribute carries species information
    pub fn is_species(&self) -> bool {
        self.key_accession() == Some(SPECIES_ONTOLOGY_CODE)
    }
}

/// Publication attached to a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    #[serde(default, rename = "pubmedID", deserialize_with = "identifier")]
    pub pubmed_id: Option<String>,

    #[serde(default, deserialize_with = "identifier")]
    pub doi: Option<String>,
}

/// Accept identifiers exported either as strings or as bare numbers.
///
/// Empty strings count as absent.
fn identifier<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number identifier, found {}",
            other
        ))),
    }
}

/// One flattened CSV line: accession followed by six pipe-joined columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    pub accession: String,
    pub instruments: String,
    pub quantification_methods: String,
    pub software: String,
    pub ptms: String,
    pub species: String,
    pub publication_ids: String,
}

impl CsvRow {
    /// Column values in header order
    pub fn fields(&self) -> [&str; 7] {
        [
            self.accession.as_str(),
            self.instruments.as_str(),
            self.quantification_methods.as_str(),
            self.software.as_str(),
            self.ptms.as_str(),
            self.species.as_str(),
            self.publication_ids.as_str(),
        ]
    }
}

impl fmt::Display for CsvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                write!(f, "{}", FIELD_SEPARATOR)?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}

/// How a run treats existing output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Write the header and every input record
    Full,
    /// Carry a prior CSV forward and only append unseen accessions
    Incremental { prior_path: PathBuf },
}

impl RunMode {
    pub fn is_incremental(&self) -> bool {
        matches!(self, RunMode::Incremental { .. })
    }
}

/// Stage of a run; a run only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CopyingPrior,
    ProcessingNew,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::CopyingPrior => write!(f, "copying prior results"),
            Phase::ProcessingNew => write!(f, "processing new records"),
        }
    }
}

/// Processing statistics
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub prior_rows_copied: usize,
    pub records_read: usize,
    pub rows_written: usize,
    pub records_excluded: usize,
    pub lines_skipped: usize,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}
