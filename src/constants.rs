//! Application constants for the annotation summary
//!
//! Fixed CSV layout, separators and ontology codes shared by the
//! extraction and output stages.

// =============================================================================
// CSV Layout
// =============================================================================

/// Column names, in output order
pub const COLUMNS: &[&str] = &[
    "ProjectAccession",
    "Instrument",
    "Quantification Method",
    "Software",
    "PTM",
    "Species",
    "Publication_ids",
];

/// Header line written at the top of a full (non-incremental) run
pub const CSV_HEADER: &str =
    "ProjectAccession,Instrument,Quantification Method,Software,PTM,Species,Publication_ids";

/// Separator between CSV columns
pub const FIELD_SEPARATOR: char = ',';

/// Separator between values inside a multi-value column
pub const MULTI_VALUE_SEPARATOR: &str = "|";

// =============================================================================
// Ontology and Publication Identifiers
// =============================================================================

/// OBI term marking a sample attribute as organism/species information
pub const SPECIES_ONTOLOGY_CODE: &str = "OBI:0100026";

/// Prefix applied to PubMed identifiers
pub const PUBMED_PREFIX: &str = "PMID:";

/// Prefix applied to DOIs
pub const DOI_PREFIX: &str = "doi:";

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "missing-annotations";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Spinner refresh cadence, in rows written
pub const PROGRESS_UPDATE_INTERVAL: u64 = 500;
