//! Error types for the tabclean library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabclean operations.
///
/// The source-side kinds abort a run before any stage executes,
/// `InsufficientData` aborts mid-pipeline, and `SinkWrite` is raised after
/// the cleaned dataset already exists. Recoverable conditions such as
/// unparseable dates, duplicates, and missing values are never errors;
/// they only show up in the report.
#[derive(Debug, Error)]
pub enum TabcleanError {
    /// The source could not be found or opened.
    #[error("Source unavailable '{path}': {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source held no header or no data rows.
    #[error("Empty source: {0}")]
    SourceEmpty(String),

    /// The source could not be parsed into a rectangular table.
    #[error("Malformed source at row {row}: {message}")]
    SourceMalformed { row: usize, message: String },

    /// A numeric column had no present values to compute a fill from.
    #[error("Insufficient data in numeric column '{column}': no present values to average")]
    InsufficientData { column: String },

    /// The sink failed to persist the cleaned dataset.
    #[error("Failed to write '{path}': {message}")]
    SinkWrite { path: PathBuf, message: String },

    /// A cell address outside the dataset.
    #[error("Cell ({row}, {column}) is out of bounds")]
    CellOutOfBounds { row: usize, column: usize },

    /// A column whose length differs from the rest of the dataset.
    #[error("Column '{column}' has {actual} cells, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TabcleanError {
    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            TabcleanError::SourceUnavailable { path, source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                format!("Input file not found: {}", path.display())
            }
            TabcleanError::SourceUnavailable { path, .. } => {
                format!("Input file could not be read: {}", path.display())
            }
            TabcleanError::SourceEmpty(_) => "Input contains no data rows.".to_string(),
            TabcleanError::SourceMalformed { row, .. } => {
                format!("Input is not a well-formed table (problem near row {}).", row)
            }
            TabcleanError::InsufficientData { column } => format!(
                "Column '{}' has no values at all; cannot compute a fill value.",
                column
            ),
            TabcleanError::SinkWrite { path, .. } => {
                format!("Cleaned data could not be saved to {}.", path.display())
            }
            other => other.to_string(),
        }
    }

    /// Whether the error was raised while loading the source.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            TabcleanError::SourceUnavailable { .. }
                | TabcleanError::SourceEmpty(_)
                | TabcleanError::SourceMalformed { .. }
        )
    }
}

impl From<csv::Error> for TabcleanError {
    fn from(err: csv::Error) -> Self {
        let row = err
            .position()
            .map(|p| p.record() as usize)
            .unwrap_or_default();
        TabcleanError::SourceMalformed {
            row,
            message: err.to_string(),
        }
    }
}

/// Result type alias for tabclean operations.
pub type Result<T> = std::result::Result<T, TabcleanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = TabcleanError::SourceUnavailable {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_source_error());
        assert_eq!(err.user_message(), "Input file not found: missing.csv");
    }

    #[test]
    fn test_insufficient_data_names_column() {
        let err = TabcleanError::InsufficientData {
            column: "weight".to_string(),
        };
        assert!(!err.is_source_error());
        assert!(err.to_string().contains("weight"));
        assert!(err.user_message().contains("weight"));
    }
}
