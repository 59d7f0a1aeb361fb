//! Missing Annotations
//!
//! Converts a newline-delimited JSON export of PRIDE proteomics projects into
//! a flat CSV with one row per project, listing instrument, quantification
//! method, software, PTM, species and publication identifiers. Empty columns
//! point curators at projects that still need annotating.
//!
//! In incremental mode a previously generated CSV is carried forward
//! unchanged and only projects whose accession it does not contain are
//! appended.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod models;
pub mod processor;

pub use config::{ConverterConfig, ErrorPolicy, SpeciesKeyPolicy};
pub use error::{ConverterError, Result};
pub use extraction::{
    RowFormatter, extract_accessions, extract_publication_ids, extract_species, format_row,
};
pub use models::{CsvRow, ProjectRecord, RunMode, RunStats};
pub use processor::RecordTransformer;
