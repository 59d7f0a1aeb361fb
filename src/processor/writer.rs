//! Buffered CSV line output.
//!
//! Lines are written exactly as given with a trailing `\n`; no quoting or
//! escaping is applied.

use crate::error::{ConverterError, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Single writer for the output CSV
#[derive(Debug)]
pub struct CsvLineWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    lines_written: usize,
}

impl CsvLineWriter {
    /// Create (or truncate) the output file
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .await
            .map_err(|e| ConverterError::io(path, e))?;
        debug!("Opened output {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
            lines_written: 0,
        })
    }

    /// Append one line followed by a newline
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ConverterError::io(&self.path, e))?;
        self.inner
            .write_all(b"\n")
            .await
            .map_err(|e| ConverterError::io(&self.path, e))?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush buffered output and close the file
    pub async fn finish(mut self) -> Result<usize> {
        self.inner
            .shutdown()
            .await
            .map_err(|e| ConverterError::io(&self.path, e))?;
        debug!(
            "Closed output {} after {} lines",
            self.path.display(),
            self.lines_written
        );
        Ok(self.lines_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lines_are_newline_terminated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        let mut writer = CsvLineWriter::create(&path).await.unwrap();
        writer.write_line("a,b").await.unwrap();
        writer.write_line("").await.unwrap();
        writer.write_line("c,d").await.unwrap();
        assert_eq!(writer.lines_written(), 3);
        assert_eq!(writer.finish().await.unwrap(), 3);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n\nc,d\n");
    }

    #[tokio::test]
    async fn test_create_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope").join("out.csv");

        match CsvLineWriter::create(&path).await {
            Err(ConverterError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
