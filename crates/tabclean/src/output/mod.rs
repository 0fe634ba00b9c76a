//! Output sinks for cleaned datasets.

mod sink;

pub use sink::{DelimitedSink, JsonSink, TabularSink};
