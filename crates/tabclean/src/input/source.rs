//! Data source abstraction and metadata.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, KindInference};
use crate::error::Result;

use super::parser::{Parser, ParserConfig};

/// Metadata about the source data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the source was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }

    /// Metadata for a dataset that did not come from a file.
    pub fn in_memory(name: impl Into<String>, dataset: &Dataset) -> Self {
        let name = name.into();
        Self {
            file: name.clone(),
            path: PathBuf::from(name),
            hash: String::new(),
            size_bytes: 0,
            format: "memory".to_string(),
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// Raw parsed tabular data, every cell still a string.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }
}

/// Produces a fully materialized dataset from a location.
///
/// Implementations fail with `SourceUnavailable`, `SourceEmpty`, or
/// `SourceMalformed`, and must release any handle they open before returning.
pub trait TabularSource {
    /// Load the dataset at `location`.
    fn load(&self, location: &Path) -> Result<(Dataset, SourceMetadata)>;
}

/// Reads CSV/TSV files and types their columns.
#[derive(Debug, Clone)]
pub struct CsvSource {
    parser: Parser,
    inference: KindInference,
}

impl CsvSource {
    /// Create a source from parser settings and a kind inference.
    pub fn new(config: ParserConfig, inference: KindInference) -> Self {
        Self {
            parser: Parser::with_config(config),
            inference,
        }
    }

    /// Type a raw table without touching the filesystem.
    pub fn load_bytes(&self, name: &str, bytes: &[u8]) -> Result<(Dataset, SourceMetadata)> {
        let (table, format) = self.parser.parse_bytes(bytes)?;
        let dataset = self.inference.build(&table)?;
        let mut metadata = SourceMetadata::in_memory(name, &dataset);
        metadata.format = format;
        metadata.size_bytes = bytes.len() as u64;
        Ok((dataset, metadata))
    }
}

impl TabularSource for CsvSource {
    fn load(&self, location: &Path) -> Result<(Dataset, SourceMetadata)> {
        let (table, metadata) = self.parser.parse_file(location)?;
        let dataset = self.inference.build(&table)?;
        Ok((dataset, metadata))
    }
}
