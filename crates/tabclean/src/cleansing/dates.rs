//! Accepted calendar formats for temporal coercion.
//!
//! Formats are tried in order: RFC 3339 first, then the ISO-8601 date-time
//! and date layouts, then common locale-agnostic layouts. Slash dates with the
//! year last are read month-first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Comma/whitespace runs collapsed before month-name parsing.
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s]+").unwrap());

/// How a format pattern is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Date and time of day.
    DateTime,
    /// Date only; stored at midnight.
    Date,
    /// Date only with a month name; separators normalized first.
    MonthName,
}

/// One accepted input format.
#[derive(Debug, Clone, Copy)]
pub struct DateFormat {
    /// `chrono` strftime pattern.
    pub pattern: &'static str,
    pub kind: FormatKind,
    /// Human-readable description.
    pub description: &'static str,
}

/// Formats tried after RFC 3339, in order.
pub const ACCEPTED_FORMATS: &[DateFormat] = &[
    DateFormat {
        pattern: "%Y-%m-%dT%H:%M:%S%.f",
        kind: FormatKind::DateTime,
        description: "ISO date-time (YYYY-MM-DDTHH:MM:SS)",
    },
    DateFormat {
        pattern: "%Y-%m-%d %H:%M:%S%.f",
        kind: FormatKind::DateTime,
        description: "ISO date-time with space (YYYY-MM-DD HH:MM:SS)",
    },
    DateFormat {
        pattern: "%Y-%m-%dT%H:%M",
        kind: FormatKind::DateTime,
        description: "ISO date-time without seconds",
    },
    DateFormat {
        pattern: "%Y-%m-%d %H:%M",
        kind: FormatKind::DateTime,
        description: "ISO date-time with space, without seconds",
    },
    DateFormat {
        pattern: "%Y-%m-%d",
        kind: FormatKind::Date,
        description: "ISO (YYYY-MM-DD)",
    },
    DateFormat {
        pattern: "%Y/%m/%d",
        kind: FormatKind::Date,
        description: "Year first (YYYY/MM/DD)",
    },
    DateFormat {
        pattern: "%m/%d/%Y",
        kind: FormatKind::Date,
        description: "US (MM/DD/YYYY)",
    },
    DateFormat {
        pattern: "%d.%m.%Y",
        kind: FormatKind::Date,
        description: "Dotted (DD.MM.YYYY)",
    },
    DateFormat {
        pattern: "%B %d %Y",
        kind: FormatKind::MonthName,
        description: "Month name first (Jan 15 2024, January 15, 2024)",
    },
    DateFormat {
        pattern: "%d %B %Y",
        kind: FormatKind::MonthName,
        description: "Day first with month name (15 Jan 2024)",
    },
];

/// Parse a raw value as a calendar date/time.
pub fn parse_temporal(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    let normalized = SEPARATOR_RUNS.replace_all(trimmed, " ");

    ACCEPTED_FORMATS.iter().find_map(|format| match format.kind {
        FormatKind::DateTime => NaiveDateTime::parse_from_str(trimmed, format.pattern).ok(),
        FormatKind::Date => NaiveDate::parse_from_str(trimmed, format.pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        FormatKind::MonthName => NaiveDate::parse_from_str(&normalized, format.pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
    })
}
