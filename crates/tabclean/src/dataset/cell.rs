//! Cell values held by a dataset column.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// `Absent` is the explicit missing marker. It is distinct from zero, from the
/// empty string, and from `Placeholder`, which is the textual marker a cell
/// receives when a missing value has been filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// No value.
    Absent,
    /// A finite number.
    Number(f64),
    /// A calendar date/time. Date-only values sit at midnight.
    Temporal(NaiveDateTime),
    /// Raw or textual value.
    Text(String),
    /// Fill marker written by the missing-value resolver.
    Placeholder(String),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Returns true if the cell holds no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Temporal value, if any.
    pub fn as_temporal(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Temporal(t) => Some(*t),
            _ => None,
        }
    }

    /// Borrowed text for `Text` and `Placeholder` cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) | Cell::Placeholder(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Equality key used for duplicate detection.
    pub(crate) fn key(&self) -> CellKey {
        match self {
            Cell::Absent => CellKey::Absent,
            // -0.0 and 0.0 are the same value; fold them onto one bit pattern.
            Cell::Number(n) if *n == 0.0 => CellKey::Number(0f64.to_bits()),
            Cell::Number(n) => CellKey::Number(n.to_bits()),
            Cell::Temporal(t) => CellKey::Temporal(*t),
            // A filled marker equals a source value with the same text.
            Cell::Text(s) | Cell::Placeholder(s) => CellKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Absent => Ok(()),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Temporal(t) if t.time() == NaiveTime::MIN => {
                write!(f, "{}", t.format("%Y-%m-%d"))
            }
            Cell::Temporal(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.f")),
            Cell::Text(s) | Cell::Placeholder(s) => f.write_str(s),
        }
    }
}

/// Hashable view of a cell. Numbers compare by exact value, no tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey {
    Absent,
    Number(u64),
    Temporal(NaiveDateTime),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Absent.to_string(), "");
        assert_eq!(Cell::Number(1.0).to_string(), "1");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Temporal(midnight(2023, 1, 5)).to_string(), "2023-01-05");
        assert_eq!(Cell::text("abc").to_string(), "abc");
        assert_eq!(Cell::Placeholder("Unknown".into()).to_string(), "Unknown");
    }

    #[test]
    fn test_display_datetime() {
        let t = NaiveDate::from_ymd_opt(2023, 1, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(Cell::Temporal(t).to_string(), "2023-01-05 14:30:00");
    }

    #[test]
    fn test_accessors() {
        let day = midnight(2024, 2, 29);
        assert_eq!(Cell::Temporal(day).as_temporal(), Some(day));
        assert_eq!(Cell::text("x").as_temporal(), None);
        assert_eq!(Cell::Placeholder("Unknown".into()).as_text(), Some("Unknown"));
        assert_eq!(Cell::Number(1.0).as_text(), None);
    }

    #[test]
    fn test_keys() {
        assert_eq!(Cell::Number(0.0).key(), Cell::Number(-0.0).key());
        assert_ne!(Cell::Number(0.1 + 0.2).key(), Cell::Number(0.3).key());
        assert_eq!(
            Cell::text("Unknown").key(),
            Cell::Placeholder("Unknown".into()).key()
        );
        assert_ne!(Cell::Absent.key(), Cell::text("").key());
    }
}
