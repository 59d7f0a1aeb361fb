//! Field extraction and row formatting.
//!
//! Turns one parsed [`ProjectRecord`] into a [`CsvRow`]. Every list column is
//! extracted in source order and joined with `|`; an absent list yields an
//! empty column.

use crate::config::SpeciesKeyPolicy;
use crate::constants::{DOI_PREFIX, MULTI_VALUE_SEPARATOR, PUBMED_PREFIX};
use crate::error::{ConverterError, Result};
use crate::models::{CsvRow, CvTerm, ProjectRecord, ProjectReference, SampleAttribute};

/// A sample attribute at `position` has no key accession
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sample attribute {position} has no key accession")]
pub struct KeylessAttribute {
    pub position: usize,
}

/// Accessions of a CV term list, in order.
///
/// A term without an accession contributes an empty item.
pub fn extract_accessions(terms: Option<&[CvTerm]>) -> Vec<String> {
    terms
        .unwrap_or_default()
        .iter()
        .map(|term| term.accession.clone().unwrap_or_default())
        .collect()
}

/// Species accessions from the values of species-keyed sample attributes.
///
/// Under [`SpeciesKeyPolicy::Strict`] an attribute without a key accession
/// is an error; under `Lenient` it is not a species entry.
pub fn extract_species(
    attributes: Option<&[SampleAttribute]>,
    policy: SpeciesKeyPolicy,
) -> std::result::Result<Vec<String>, KeylessAttribute> {
    let mut species = Vec::new();

    for (position, attribute) in attributes.unwrap_or_default().iter().enumerate() {
        if attribute.key_accession().is_none() {
            match policy {
                SpeciesKeyPolicy::Strict => return Err(KeylessAttribute { position }),
                SpeciesKeyPolicy::Lenient => continue,
            }
        }

        if attribute.is_species() {
            species.extend(extract_accessions(attribute.value.as_deref()));
        }
    }

    Ok(species)
}

/// `PMID:` and `doi:` identifiers of each reference, PubMed first
pub fn extract_publication_ids(references: Option<&[ProjectReference]>) -> Vec<String> {
    let mut ids = Vec::new();

    for reference in references.unwrap_or_default() {
        if let Some(pubmed_id) = &reference.pubmed_id {
            ids.push(format!("{}{}", PUBMED_PREFIX, pubmed_id));
        }
        if let Some(doi) = &reference.doi {
            ids.push(format!("{}{}", DOI_PREFIX, doi));
        }
    }

    ids
}

fn join(values: Vec<String>) -> String {
    values.join(MULTI_VALUE_SEPARATOR)
}

/// Formats records into rows under a fixed species key policy
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFormatter {
    species_keys: SpeciesKeyPolicy,
}

impl RowFormatter {
    pub fn new(species_keys: SpeciesKeyPolicy) -> Self {
        Self { species_keys }
    }

    /// Parse one NDJSON line; `line` is only used for error reporting
    pub fn parse(&self, text: &str, line: usize) -> Result<ProjectRecord> {
        serde_json::from_str(text).map_err(|source| ConverterError::MalformedRecord { line, source })
    }

    /// Flatten a record into its CSV row
    pub fn format(&self, record: &ProjectRecord, line: usize) -> Result<CsvRow> {
        let accession = record
            .accession
            .clone()
            .ok_or(ConverterError::MissingAccession { line })?;

        let species = extract_species(record.sample_attributes.as_deref(), self.species_keys)
            .map_err(|KeylessAttribute { position }| ConverterError::MissingSpeciesKey {
                line,
                position,
                accession: accession.clone(),
            })?;

        Ok(CsvRow {
            accession,
            instruments: join(extract_accessions(record.instruments.as_deref())),
            quantification_methods: join(extract_accessions(
                record.quantification_methods.as_deref(),
            )),
            software: join(extract_accessions(record.software_list.as_deref())),
            ptms: join(extract_accessions(record.ptm_list.as_deref())),
            species: join(species),
            publication_ids: join(extract_publication_ids(record.project_references.as_deref())),
        })
    }
}

/// Format a record as a CSV line using the strict species key policy.
///
/// The line number is unknown here, so errors report line 0.
pub fn format_row(record: &ProjectRecord) -> Result<String> {
    RowFormatter::default()
        .format(record, 0)
        .map(|row| row.to_string())
}
