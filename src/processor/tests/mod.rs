//! Integration tests for the processor module
//!
//! Runs complete conversions over small NDJSON exports written to temp dirs.


use crate::config::ConverterConfig;
use crate::models::RunMode;
use crate::processor::RecordTransformer;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `lines` as an NDJSON file and return its path
pub fn write_input(temp_dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = temp_dir.path().join("projects.json");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

/// Transformer with the spinner disabled
pub fn transformer(input: &Path, output: &Path, mode: RunMode) -> RecordTransformer {
    RecordTransformer::new(input.to_path_buf(), output.to_path_buf(), mode)
        .with_config(ConverterConfig::default().without_progress())
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
