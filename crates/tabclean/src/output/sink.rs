//! Sinks that persist a cleaned dataset.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::dataset::{Cell, Dataset};
use crate::error::{Result, TabcleanError};

/// Persists a dataset to a location.
///
/// A failed write leaves the dataset untouched so the caller can retry.
pub trait TabularSink {
    /// Write `dataset` to `location`.
    fn write(&self, dataset: &Dataset, location: &Path) -> Result<()>;
}

fn write_error(location: &Path, err: impl std::fmt::Display) -> TabcleanError {
    TabcleanError::SinkWrite {
        path: location.to_path_buf(),
        message: err.to_string(),
    }
}

/// Writes delimited text (CSV, TSV, ...). Absent cells become empty fields.
#[derive(Debug, Clone)]
pub struct DelimitedSink {
    delimiter: u8,
}

impl DelimitedSink {
    /// Comma-separated output.
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-separated output.
    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Output with a custom delimiter.
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl TabularSink for DelimitedSink {
    fn write(&self, dataset: &Dataset, location: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(location)
            .map_err(|e| write_error(location, e))?;

        writer
            .write_record(dataset.column_names())
            .map_err(|e| write_error(location, e))?;

        for row in 0..dataset.row_count() {
            let record: Vec<String> = dataset
                .row(row)
                .unwrap_or_default()
                .into_iter()
                .map(Cell::to_string)
                .collect();
            writer
                .write_record(&record)
                .map_err(|e| write_error(location, e))?;
        }

        writer.flush().map_err(|e| write_error(location, e))
    }
}

/// Writes a JSON array with one object per row.
#[derive(Debug, Clone, Default)]
pub struct JsonSink {
    pretty: bool,
}

impl JsonSink {
    /// Compact JSON output.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    fn records(dataset: &Dataset) -> Vec<IndexMap<&str, Value>> {
        let names = dataset.column_names();
        (0..dataset.row_count())
            .map(|row| {
                names
                    .iter()
                    .enumerate()
                    .map(|(col, name)| {
                        let value = dataset.get_cell(row, col).map(cell_to_json).unwrap_or(Value::Null);
                        (*name, value)
                    })
                    .collect()
            })
            .collect()
    }
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Absent => Value::Null,
        Cell::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        other => Value::String(other.to_string()),
    }
}

impl TabularSink for JsonSink {
    fn write(&self, dataset: &Dataset, location: &Path) -> Result<()> {
        let file = File::create(location).map_err(|e| write_error(location, e))?;
        let mut writer = BufWriter::new(file);
        let records = Self::records(dataset);

        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &records)
        } else {
            serde_json::to_writer(&mut writer, &records)
        };
        written.map_err(|e| write_error(location, e))?;

        writer.flush().map_err(|e| write_error(location, e))
    }
}
