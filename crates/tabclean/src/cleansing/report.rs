//! Stage outcomes and the run report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Effect of a stage on one column (or on the whole table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEffect {
    /// Affected column, or `_table` for row-level effects.
    pub column: String,
    /// Cells or rows affected.
    pub affected: usize,
    /// One-line description.
    pub note: String,
}

impl ColumnEffect {
    pub fn new(column: impl Into<String>, affected: usize, note: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            affected,
            note: note.into(),
        }
    }
}

/// What one stage did to the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Stage name.
    pub stage: String,
    /// Whether any cell or row was changed.
    pub corrected: bool,
    /// Count of affected cells (or rows, for row-level stages).
    pub affected: usize,
    /// Human-readable summary.
    pub summary: String,
    /// Per-column breakdown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnEffect>,
}

impl StepOutcome {
    /// Create an outcome; `corrected` follows from `affected`.
    pub fn new(stage: impl Into<String>, affected: usize, summary: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            corrected: affected > 0,
            affected,
            summary: summary.into(),
            columns: Vec::new(),
        }
    }

    /// Attach the per-column breakdown.
    pub fn with_columns(mut self, columns: Vec<ColumnEffect>) -> Self {
        self.columns = columns;
        self
    }

    /// Affected count recorded for a column.
    pub fn affected_in(&self, column: &str) -> usize {
        self.columns
            .iter()
            .filter(|c| c.column == column)
            .map(|c| c.affected)
            .sum()
    }
}

/// Ordered record of every stage outcome in a run.
///
/// Only the pipeline appends to a report; callers get it read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    outcomes: Vec<StepOutcome>,
}

impl ValidationReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    /// Outcomes in stage order.
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Outcome for a stage by name.
    pub fn outcome(&self, stage: &str) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.stage == stage)
    }

    /// Stage name and summary pairs, in stage order.
    pub fn lines(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .map(|o| (o.stage.as_str(), o.summary.as_str()))
            .collect()
    }

    /// Sum of affected counts across stages.
    pub fn total_affected(&self) -> usize {
        self.outcomes.iter().map(|o| o.affected).sum()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stage, summary) in self.lines() {
            writeln!(f, "{}: {}", stage, summary)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_builder() {
        let outcome = StepOutcome::new("fill_missing", 3, "Filled 3 absent cells")
            .with_columns(vec![
                ColumnEffect::new("age", 2, "2 cells filled"),
                ColumnEffect::new("city", 1, "1 cell filled"),
            ]);

        assert!(outcome.corrected);
        assert_eq!(outcome.affected_in("age"), 2);
        assert_eq!(outcome.affected_in("zip"), 0);
        assert!(!StepOutcome::new("coerce_types", 0, "nothing").corrected);
    }

    #[test]
    fn test_report_lines_keep_order() {
        let mut report = ValidationReport::new();
        report.push(StepOutcome::new("coerce_types", 1, "a"));
        report.push(StepOutcome::new("fill_missing", 2, "b"));
        report.push(StepOutcome::new("remove_duplicates", 0, "c"));

        assert_eq!(
            report.lines(),
            vec![("coerce_types", "a"), ("fill_missing", "b"), ("remove_duplicates", "c")]
        );
        assert_eq!(report.total_affected(), 3);
        assert_eq!(report.to_string(), "coerce_types: a\nfill_missing: b\nremove_duplicates: c\n");
        assert!(report.to_json().unwrap().contains("\"fill_missing\""));
    }
}
