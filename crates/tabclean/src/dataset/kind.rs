//! Column kind inference.
//!
//! Temporal detection is delegated to a [`TemporalPredicate`] so that a
//! schema-driven rule can replace the default name heuristic without touching
//! the stages.

use std::sync::Arc;

use crate::error::Result;
use crate::input::DataTable;

use super::cell::Cell;
use super::column::{Column, ColumnKind};
use super::table::Dataset;

/// Decides whether a column holds calendar values.
pub trait TemporalPredicate: Send + Sync {
    /// Returns true if the named column should be treated as temporal.
    fn is_temporal(&self, column_name: &str) -> bool;
}

impl<F> TemporalPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_temporal(&self, column_name: &str) -> bool {
        self(column_name)
    }
}

/// Matches column names containing any of a set of tokens, ignoring case.
#[derive(Debug, Clone)]
pub struct NameTokenPredicate {
    tokens: Vec<String>,
}

impl NameTokenPredicate {
    /// Create a predicate from tokens. Blank tokens are ignored.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

impl Default for NameTokenPredicate {
    fn default() -> Self {
        Self::new(["date"])
    }
}

impl TemporalPredicate for NameTokenPredicate {
    fn is_temporal(&self, column_name: &str) -> bool {
        let lower = column_name.to_lowercase();
        self.tokens.iter().any(|t| lower.contains(t.as_str()))
    }
}

/// Turns raw string tables into typed datasets.
#[derive(Clone)]
pub struct KindInference {
    predicate: Arc<dyn TemporalPredicate>,
    null_tokens: Vec<String>,
}

impl KindInference {
    /// Create an inference with a predicate and the raw strings that count as absent.
    pub fn new(predicate: Arc<dyn TemporalPredicate>, null_tokens: &[String]) -> Self {
        Self {
            predicate,
            null_tokens: null_tokens.iter().map(|t| t.trim().to_lowercase()).collect(),
        }
    }

    /// Check if a raw value represents a missing value.
    pub fn is_null_value(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.null_tokens.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
    }

    /// Infer the kind of a column from its name and raw values.
    pub fn infer<'a>(&self, name: &str, values: impl IntoIterator<Item = &'a str>) -> ColumnKind {
        if self.predicate.is_temporal(name) {
            return ColumnKind::Temporal;
        }

        let all_numeric = values
            .into_iter()
            .filter(|v| !self.is_null_value(v))
            .all(|v| parse_number(v).is_some());

        if all_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Textual
        }
    }

    /// Build a typed dataset from a raw table.
    pub fn build(&self, table: &DataTable) -> Result<Dataset> {
        let mut columns = Vec::with_capacity(table.column_count());

        for (index, name) in table.headers.iter().enumerate() {
            let kind = self.infer(name, table.column_values(index));
            let cells = table
                .column_values(index)
                .map(|raw| self.to_cell(raw, kind))
                .collect();
            columns.push(Column::new(name.clone(), kind, cells));
        }

        Dataset::from_columns(columns)
    }

    fn to_cell(&self, raw: &str, kind: ColumnKind) -> Cell {
        if self.is_null_value(raw) {
            return Cell::Absent;
        }
        match kind {
            ColumnKind::Numeric => parse_number(raw)
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::text(raw.trim())),
            ColumnKind::Temporal | ColumnKind::Textual => Cell::text(raw.trim()),
        }
    }
}

impl std::fmt::Debug for KindInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindInference")
            .field("null_tokens", &self.null_tokens)
            .finish_non_exhaustive()
    }
}

/// Parse a finite number that an `f64` holds without rounding.
///
/// Lexemes that would round (integers past 2^53, decimals with more than
/// 15 significant digits) are rejected, so distinct source values never
/// collapse into one number.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.parse::<f64>().ok().filter(|n| n.is_finite())?;
    is_exact(trimmed, number).then_some(number)
}

fn is_exact(lexeme: &str, number: f64) -> bool {
    let unsigned = lexeme.trim_start_matches(['+', '-']);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return lexeme
            .parse::<i128>()
            .is_ok_and(|integer| number as i128 == integer);
    }

    let mantissa = unsigned.split(['e', 'E']).next().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len() <= f64::DIGITS as usize
}
