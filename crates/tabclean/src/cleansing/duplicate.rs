//! Exact duplicate row removal.

use indexmap::IndexMap;
use tracing::debug;

use crate::dataset::{CellKey, Dataset};
use crate::error::Result;

use super::report::{ColumnEffect, StepOutcome};
use super::stage::{plural, Stage};

/// Removes rows whose every cell equals the cells of an earlier row.
///
/// The lowest-indexed row of each duplicate group survives. Numbers compare
/// by exact value with no tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateResolver;

impl DuplicateResolver {
    pub const NAME: &'static str = "remove_duplicates";

    pub fn new() -> Self {
        Self
    }

    /// Groups of row indices sharing identical values, in first-seen order.
    ///
    /// Only groups with more than one row are returned; each group is sorted
    /// ascending.
    pub fn duplicate_groups(dataset: &Dataset) -> Vec<Vec<usize>> {
        let mut groups: IndexMap<Vec<CellKey>, Vec<usize>> = IndexMap::new();
        for row in 0..dataset.row_count() {
            groups.entry(dataset.row_key(row)).or_default().push(row);
        }

        groups
            .into_values()
            .filter(|rows| rows.len() > 1)
            .collect()
    }
}

impl Stage for DuplicateResolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, dataset: &mut Dataset) -> Result<StepOutcome> {
        if dataset.column_count() == 0 {
            return Ok(StepOutcome::new(Self::NAME, 0, "0 duplicate rows removed"));
        }

        let groups = Self::duplicate_groups(dataset);
        for group in &groups {
            for &row in &group[1..] {
                dataset.mark_row_for_removal(row)?;
            }
        }

        let removed = dataset.compact();
        debug!(removed, groups = groups.len(), "removed duplicate rows");

        if removed == 0 {
            return Ok(StepOutcome::new(Self::NAME, 0, "0 duplicate rows removed"));
        }

        let samples: Vec<String> = groups
            .iter()
            .take(3)
            .map(|rows| {
                format!(
                    "rows {}",
                    rows.iter()
                        .map(|r| (r + 1).to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
            .collect();

        let summary = format!(
            "{} removed from {}: {}",
            plural(removed, "duplicate row", "duplicate rows"),
            plural(groups.len(), "group", "groups"),
            samples.join("; ")
        );

        let effect = ColumnEffect::new("_table", removed, summary.clone());
        Ok(StepOutcome::new(Self::NAME, removed, summary).with_columns(vec![effect]))
    }
}
