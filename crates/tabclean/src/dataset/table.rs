//! In-memory dataset with row-aligned columns.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::error::{Result, TabcleanError};

use super::cell::{Cell, CellKey};
use super::column::{Column, ColumnKind};

/// Ordered, uniquely named columns that all share one row count.
///
/// All mutation goes through methods that address a single cell or whole
/// rows, so no column can change length independently of the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
    row_count: usize,
    marked: BTreeSet<usize>,
}

impl Dataset {
    /// Create a dataset from columns.
    ///
    /// Fails if two columns share a name or if lengths differ.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut map = IndexMap::with_capacity(columns.len());

        for column in columns {
            let actual = column.len();
            if actual != row_count {
                return Err(TabcleanError::ColumnLengthMismatch {
                    column: column.name,
                    expected: row_count,
                    actual,
                });
            }
            if map.contains_key(&column.name) {
                return Err(TabcleanError::SourceMalformed {
                    row: 0,
                    message: format!("Duplicate column name '{}'", column.name),
                });
            }
            map.insert(column.name.clone(), column);
        }

        Ok(Self {
            columns: map,
            row_count,
            marked: BTreeSet::new(),
        })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Column by position.
    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get_index(col).map(|(_, c)| c)
    }

    /// Column by name.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Iterate columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Semantic kind of a column.
    pub fn column_kind(&self, col: usize) -> Option<ColumnKind> {
        self.column(col).map(|c| c.kind)
    }

    /// Get a specific cell.
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.column(col).and_then(|c| c.cells.get(row))
    }

    /// Overwrite a specific cell in place.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Cell) -> Result<()> {
        let slot = self
            .columns
            .get_index_mut(col)
            .and_then(|(_, c)| c.cells.get_mut(row))
            .ok_or(TabcleanError::CellOutOfBounds { row, column: col })?;
        *slot = value;
        Ok(())
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<&Cell>> {
        if row >= self.row_count {
            return None;
        }
        Some(self.columns.values().map(|c| &c.cells[row]).collect())
    }

    /// Mark a row to be dropped by the next [`compact`](Self::compact).
    pub fn mark_row_for_removal(&mut self, row: usize) -> Result<()> {
        if row >= self.row_count {
            return Err(TabcleanError::CellOutOfBounds { row, column: 0 });
        }
        self.marked.insert(row);
        Ok(())
    }

    /// Number of rows currently marked for removal.
    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// Physically drop every marked row from all columns.
    ///
    /// Returns the number of rows removed. Surviving rows keep their order.
    pub fn compact(&mut self) -> usize {
        if self.marked.is_empty() {
            return 0;
        }

        let marked = std::mem::take(&mut self.marked);
        for column in self.columns.values_mut() {
            let mut row = 0;
            column.cells.retain(|_| {
                let keep = !marked.contains(&row);
                row += 1;
                keep
            });
        }

        self.row_count -= marked.len();
        marked.len()
    }

    /// Total absent cells across all columns.
    pub fn absent_count(&self) -> usize {
        self.columns.values().map(Column::absent_count).sum()
    }

    /// Equality key of a full row.
    pub(crate) fn row_key(&self, row: usize) -> Vec<CellKey> {
        self.columns.values().map(|c| c.cells[row].key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::new(
                "id",
                ColumnKind::Numeric,
                vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)],
            ),
            Column::new(
                "name",
                ColumnKind::Textual,
                vec![Cell::text("a"), Cell::Absent, Cell::text("c")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_accessors() {
        let ds = sample();
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column_names(), vec!["id", "name"]);
        assert_eq!(ds.column_kind(0), Some(ColumnKind::Numeric));
        assert_eq!(ds.column_index("name"), Some(1));
        assert_eq!(ds.column_by_name("name").map(Column::absent_rows), Some(vec![1]));
        assert!(ds.column_by_name("missing").is_none());
        assert_eq!(ds.get_cell(1, 1), Some(&Cell::Absent));
        assert_eq!(ds.get_cell(3, 0), None);
        assert_eq!(ds.absent_count(), 1);
    }

    #[test]
    fn test_set_cell() {
        let mut ds = sample();
        ds.set_cell(1, 1, Cell::text("b")).unwrap();
        assert_eq!(ds.get_cell(1, 1), Some(&Cell::text("b")));
        assert!(matches!(
            ds.set_cell(0, 5, Cell::Absent),
            Err(TabcleanError::CellOutOfBounds { row: 0, column: 5 })
        ));
    }

    #[test]
    fn test_compact_keeps_alignment() {
        let mut ds = sample();
        ds.mark_row_for_removal(1).unwrap();
        ds.mark_row_for_removal(1).unwrap();
        assert_eq!(ds.marked_count(), 1);

        assert_eq!(ds.compact(), 1);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.get_cell(1, 0), Some(&Cell::Number(3.0)));
        assert_eq!(ds.get_cell(1, 1), Some(&Cell::text("c")));
        assert!(ds.columns().all(|c| c.len() == 2));
        assert_eq!(ds.compact(), 0);
    }

    #[test]
    fn test_mark_out_of_range() {
        let mut ds = sample();
        assert!(ds.mark_row_for_removal(3).is_err());
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = Dataset::from_columns(vec![
            Column::new("a", ColumnKind::Textual, vec![Cell::Absent]),
            Column::new("b", ColumnKind::Textual, vec![]),
        ]);
        assert!(matches!(
            result,
            Err(TabcleanError::ColumnLengthMismatch { ref column, expected: 1, actual: 0 })
                if column == "b"
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Dataset::from_columns(vec![
            Column::new("a", ColumnKind::Textual, vec![]),
            Column::new("a", ColumnKind::Textual, vec![]),
        ]);
        assert!(matches!(result, Err(TabcleanError::SourceMalformed { .. })));
    }
}
