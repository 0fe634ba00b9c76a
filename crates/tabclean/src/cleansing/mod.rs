//! Cleansing stages and the report they produce.

mod coerce;
pub mod dates;
mod duplicate;
mod missing;
mod report;
mod stage;

pub use coerce::TypeCoercer;
pub use duplicate::DuplicateResolver;
pub use missing::{DEFAULT_MISSING_SENTINEL, MissingValueResolver};
pub use report::{ColumnEffect, StepOutcome, ValidationReport};
pub use stage::Stage;
