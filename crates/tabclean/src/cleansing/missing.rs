//! Missing-value resolution.

use tracing::debug;

use crate::dataset::{Cell, ColumnKind, Dataset};
use crate::error::{Result, TabcleanError};

use super::report::{ColumnEffect, StepOutcome};
use super::stage::{plural, Stage};

/// Default fill for temporal and textual columns.
pub const DEFAULT_MISSING_SENTINEL: &str = "Unknown";

/// Fills every absent cell.
///
/// Numeric columns get the mean of their own present values. Temporal and
/// textual columns get a placeholder holding the sentinel text. Fill values
/// are all computed before any cell is written, so a fully empty numeric
/// column fails the stage without touching the dataset.
#[derive(Debug, Clone)]
pub struct MissingValueResolver {
    sentinel: String,
}

impl MissingValueResolver {
    pub const NAME: &'static str = "fill_missing";

    /// Create a resolver with the given sentinel.
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// The sentinel written into non-numeric columns.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Mean of a column's present numeric values.
    ///
    /// Computed as a running mean; every intermediate stays within the range
    /// of the inputs, so finite values always give a finite mean.
    pub fn column_mean(cells: &[Cell]) -> Option<f64> {
        let (mean, count) = cells
            .iter()
            .filter_map(Cell::as_number)
            .fold((0.0, 0usize), |(mean, count), n| {
                let count = count + 1;
                let weight = count as f64;
                (mean - mean / weight + n / weight, count)
            });
        (count > 0).then_some(mean)
    }
}

impl Default for MissingValueResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_SENTINEL)
    }
}

/// Planned fill for one column.
struct Fill {
    column: usize,
    name: String,
    rows: Vec<usize>,
    value: Cell,
}

impl Stage for MissingValueResolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, dataset: &mut Dataset) -> Result<StepOutcome> {
        let mut plan = Vec::new();

        for (index, column) in dataset.columns().enumerate() {
            let rows = column.absent_rows();

            let value = match column.kind {
                ColumnKind::Numeric => match Self::column_mean(column.cells()) {
                    Some(mean) => Cell::Number(mean),
                    None if rows.is_empty() => continue,
                    None => {
                        return Err(TabcleanError::InsufficientData {
                            column: column.name.clone(),
                        });
                    }
                },
                ColumnKind::Temporal | ColumnKind::Textual => {
                    Cell::Placeholder(self.sentinel.clone())
                }
            };

            if !rows.is_empty() {
                plan.push(Fill {
                    column: index,
                    name: column.name.clone(),
                    rows,
                    value,
                });
            }
        }

        let mut effects = Vec::with_capacity(plan.len());
        for fill in plan {
            for &row in &fill.rows {
                dataset.set_cell(row, fill.column, fill.value.clone())?;
            }

            let note = match &fill.value {
                Cell::Number(mean) => format!(
                    "{} in column '{}' filled with mean {}",
                    plural(fill.rows.len(), "cell", "cells"),
                    fill.name,
                    mean
                ),
                other => format!(
                    "{} in column '{}' filled with '{}'",
                    plural(fill.rows.len(), "cell", "cells"),
                    fill.name,
                    other
                ),
            };
            debug!(column = %fill.name, filled = fill.rows.len(), value = %fill.value, "filled absent cells");
            effects.push(ColumnEffect::new(fill.name, fill.rows.len(), note));
        }

        let affected: usize = effects.iter().map(|e| e.affected).sum();
        let summary = if effects.is_empty() {
            "0 absent cells found".to_string()
        } else {
            format!(
                "Filled {} across {}: {}",
                plural(affected, "absent cell", "absent cells"),
                plural(effects.len(), "column", "columns"),
                effects
                    .iter()
                    .map(|e| e.note.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            )
        };

        Ok(StepOutcome::new(Self::NAME, affected, summary).with_columns(effects))
    }
}
