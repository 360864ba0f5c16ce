//! Data loading utilities

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Loader for delimited tabular files with a header row
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Field separator
    delimiter: u8,
    /// Rows scanned to infer column types
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a comma-separated loader
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            infer_schema_length: Some(1000),
        }
    }

    /// Set the field separator
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set how many rows are scanned for schema inference (`None` scans all)
    pub fn with_infer_schema_length(mut self, n: Option<usize>) -> Self {
        self.infer_schema_length = n;
        self
    }

    /// Load a delimited file into a DataFrame.
    ///
    /// Fails with [`PipelineError::MissingFile`] when the path is not a
    /// regular file.
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame> {
        if !path.is_file() {
            return Err(PipelineError::MissingFile(path.to_path_buf()));
        }

        let start = Instant::now();
        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded delimited file"
        );
        Ok(df)
    }

    /// Pick the separator from the extension (`.tsv` is tab-separated,
    /// anything else uses the configured delimiter) and load
    pub fn load_auto(&self, path: &Path) -> Result<DataFrame> {
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);

        if is_tsv {
            self.clone().with_delimiter(b'\t').load_csv(path)
        } else {
            self.load_csv(path)
        }
    }
}
