//! The stage trait shared by every cleansing step.

use crate::dataset::Dataset;
use crate::error::Result;

use super::report::StepOutcome;

/// One pipeline step.
///
/// A stage inspects the dataset, applies its repair policy in place, and
/// reports what it changed. It either succeeds fully or returns exactly one
/// error.
pub trait Stage {
    /// Stable name used in the report.
    fn name(&self) -> &'static str;

    /// Run the stage against the dataset.
    fn apply(&self, dataset: &mut Dataset) -> Result<StepOutcome>;
}

/// Pluralize a count for summaries.
pub(crate) fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
