//! tabclean: validation and cleansing pipeline for tabular datasets.
//!
//! A run loads a table, coerces temporal columns, fills missing values, and
//! removes exact duplicate rows, in that order, then hands the cleaned
//! dataset and a per-stage report back to the caller.
//!
//! # Core Principles
//!
//! - **Explicit ownership**: the dataset is threaded through each stage by value
//! - **Closed error taxonomy**: only load, fill, and write failures are errors
//! - **Deterministic repairs**: same input, same output, same report
//!
//! # Example
//!
//! ```no_run
//! use tabclean::{Cleaner, DelimitedSink};
//!
//! let mut cleaner = Cleaner::new();
//! let run = cleaner.clean_file("customers.csv").unwrap();
//!
//! for (stage, summary) in run.report.lines() {
//!     println!("{stage}: {summary}");
//! }
//! cleaner.write(&run, &DelimitedSink::csv(), "customers_clean.csv").unwrap();
//! ```

pub mod cleansing;
pub mod dataset;
pub mod error;
pub mod input;
pub mod output;

mod cleaner;

pub use crate::cleaner::{CleanRun, Cleaner, CleanerConfig, PipelineState, RunSummary};
pub use cleansing::{ColumnEffect, Stage, StepOutcome, ValidationReport};
pub use dataset::{Cell, Column, ColumnKind, Dataset, NameTokenPredicate, TemporalPredicate};
pub use error::{Result, TabcleanError};
pub use input::{CsvSource, SourceMetadata, TabularSource};
pub use output::{DelimitedSink, JsonSink, TabularSink};
