//! Typed in-memory dataset.

mod cell;
mod column;
mod kind;
mod table;

pub use cell::Cell;
pub(crate) use cell::CellKey;
pub use column::{Column, ColumnKind};
pub use kind::{KindInference, NameTokenPredicate, TemporalPredicate};
pub use table::Dataset;
