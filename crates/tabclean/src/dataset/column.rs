//! Column definition and semantic kinds.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Semantic kind of a column, fixed once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every present value is a number.
    Numeric,
    /// Calendar date/time values.
    Temporal,
    /// Anything else.
    Textual,
}

impl ColumnKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Textual => "textual",
        }
    }
}

/// A named, typed column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within a dataset.
    pub name: String,
    /// Semantic kind.
    pub kind: ColumnKind,
    pub(crate) cells: Vec<Cell>,
}

impl Column {
    /// Create a column from its cells.
    pub fn new(name: impl Into<String>, kind: ColumnKind, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Borrow the cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Count of absent cells.
    pub fn absent_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_absent()).count()
    }

    /// Row indices of absent cells.
    pub fn absent_rows(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_absent())
            .map(|(i, _)| i)
            .collect()
    }
}
