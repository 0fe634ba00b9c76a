//! Temporal type coercion.

use tracing::{debug, warn};

use crate::dataset::{Cell, ColumnKind, Dataset};
use crate::error::Result;

use super::dates::parse_temporal;
use super::report::{ColumnEffect, StepOutcome};
use super::stage::{plural, Stage};

/// Parses every present cell of each temporal column as a date/time.
///
/// Cells that fail to parse become absent so the missing-value resolver can
/// fill them. Non-temporal columns, already-parsed cells, and fill markers
/// are left alone, which makes a second pass a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCoercer;

impl TypeCoercer {
    pub const NAME: &'static str = "coerce_types";

    pub fn new() -> Self {
        Self
    }
}

impl Stage for TypeCoercer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, dataset: &mut Dataset) -> Result<StepOutcome> {
        let mut effects = Vec::new();
        let mut temporal_columns = 0;
        let mut parsed_total = 0;

        for col in 0..dataset.column_count() {
            if dataset.column_kind(col) != Some(ColumnKind::Temporal) {
                continue;
            }
            temporal_columns += 1;

            let mut rewrites = Vec::new();
            let mut failed = 0;
            if let Some(column) = dataset.column(col) {
                for (row, cell) in column.cells().iter().enumerate() {
                    if let Cell::Text(raw) = cell {
                        match parse_temporal(raw) {
                            Some(value) => rewrites.push((row, Cell::Temporal(value))),
                            None => {
                                failed += 1;
                                rewrites.push((row, Cell::Absent));
                            }
                        }
                    }
                }
            }

            let parsed = rewrites.len() - failed;
            parsed_total += parsed;
            for (row, cell) in rewrites {
                dataset.set_cell(row, col, cell)?;
            }

            let name = dataset.column(col).map(|c| c.name.clone()).unwrap_or_default();
            debug!(column = %name, parsed, failed, "coerced temporal column");

            if failed > 0 {
                warn!(column = %name, failed, "unparseable dates coerced to empty");
                effects.push(ColumnEffect::new(
                    name.as_str(),
                    failed,
                    format!(
                        "{} in column '{}' coerced to empty due to unparseable date",
                        plural(failed, "cell", "cells"),
                        name
                    ),
                ));
            }
        }

        let affected: usize = effects.iter().map(|e| e.affected).sum();
        let summary = if effects.is_empty() {
            format!(
                "0 cells coerced to empty; {} parsed across {}",
                plural(parsed_total, "date", "dates"),
                plural(temporal_columns, "temporal column", "temporal columns")
            )
        } else {
            effects
                .iter()
                .map(|e| e.note.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };

        Ok(StepOutcome::new(Self::NAME, affected, summary).with_columns(effects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::new(
                "signup_date",
                ColumnKind::Temporal,
                vec![
                    Cell::text("2023-01-05"),
                    Cell::text("not-a-date"),
                    Cell::Absent,
                    Cell::text("01/31/2023"),
                ],
            ),
            Column::new(
                "note",
                ColumnKind::Textual,
                vec![
                    Cell::text("not-a-date"),
                    Cell::text("x"),
                    Cell::Absent,
                    Cell::text("y"),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_coerces_temporal_column() {
        let mut ds = dataset();
        let outcome = TypeCoercer.apply(&mut ds).unwrap();

        assert!(outcome.corrected);
        assert_eq!(outcome.affected, 1);
        assert_eq!(
            outcome.summary,
            "1 cell in column 'signup_date' coerced to empty due to unparseable date"
        );
        assert!(matches!(ds.get_cell(0, 0), Some(Cell::Temporal(_))));
        assert_eq!(ds.get_cell(1, 0), Some(&Cell::Absent));
        assert_eq!(ds.get_cell(2, 0), Some(&Cell::Absent));
        assert!(matches!(ds.get_cell(3, 0), Some(Cell::Temporal(_))));
        // Textual column untouched.
        assert_eq!(ds.get_cell(0, 1), Some(&Cell::text("not-a-date")));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut ds = dataset();
        TypeCoercer.apply(&mut ds).unwrap();
        let snapshot = ds.clone();

        let outcome = TypeCoercer.apply(&mut ds).unwrap();
        assert!(!outcome.corrected);
        assert_eq!(outcome.affected, 0);
        assert_eq!(ds, snapshot);
    }

    #[test]
    fn test_placeholder_is_not_recoerced() {
        let mut ds = Dataset::from_columns(vec![Column::new(
            "event_date",
            ColumnKind::Temporal,
            vec![Cell::Placeholder("Unknown".into())],
        )])
        .unwrap();

        let outcome = TypeCoercer.apply(&mut ds).unwrap();
        assert_eq!(outcome.affected, 0);
        assert_eq!(ds.get_cell(0, 0), Some(&Cell::Placeholder("Unknown".into())));
    }
}
