//! Main Cleaner struct and public API.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn};

use crate::cleansing::{
    DEFAULT_MISSING_SENTINEL, DuplicateResolver, MissingValueResolver, Stage, TypeCoercer,
    ValidationReport,
};
use crate::dataset::{Dataset, KindInference, NameTokenPredicate, TemporalPredicate};
use crate::error::{Result, TabcleanError};
use crate::input::{CsvSource, ParserConfig, SourceMetadata, TabularSource};
use crate::output::TabularSink;

/// Configuration for a cleansing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Name tokens that mark a column as temporal (case-insensitive).
    pub temporal_tokens: Vec<String>,
    /// Raw values read as absent.
    pub null_tokens: Vec<String>,
    /// Fill value for temporal and textual columns.
    pub missing_sentinel: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            temporal_tokens: vec!["date".to_string()],
            null_tokens: ["", "NA", "N/A", "null", "none", "nil", "NaN", ".", "-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            missing_sentinel: DEFAULT_MISSING_SENTINEL.to_string(),
        }
    }
}

impl CleanerConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TabcleanError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.missing_sentinel.trim().is_empty() {
            return Err(TabcleanError::Config(
                "missing_sentinel must not be blank".to_string(),
            ));
        }
        if self.parser.delimiter == Some(self.parser.quote) {
            return Err(TabcleanError::Config(
                "delimiter and quote character must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lifecycle of one run. Transitions are strictly linear; any error moves
/// to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    NotStarted,
    Loaded,
    Coerced,
    Filled,
    Deduplicated,
    Complete,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineState::NotStarted => "not started",
            PipelineState::Loaded => "loaded",
            PipelineState::Coerced => "coerced",
            PipelineState::Filled => "filled",
            PipelineState::Deduplicated => "deduplicated",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Row and cell counts for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
    /// Cells coerced or filled plus rows removed.
    pub total_affected: usize,
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct CleanRun {
    /// Where the data came from.
    pub source: SourceMetadata,
    /// The cleaned dataset.
    pub dataset: Dataset,
    /// What each stage did.
    pub report: ValidationReport,
    pub summary: RunSummary,
}

/// The validation orchestrator.
///
/// Runs coercion, missing-value resolution, and duplicate removal in that
/// fixed order over a dataset it owns for the duration of the run.
pub struct Cleaner {
    config: CleanerConfig,
    predicate: Arc<dyn TemporalPredicate>,
    state: PipelineState,
}

impl Cleaner {
    /// Create a new Cleaner with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    /// Create a Cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        let predicate: Arc<dyn TemporalPredicate> =
            Arc::new(NameTokenPredicate::new(&config.temporal_tokens));
        Self {
            config,
            predicate,
            state: PipelineState::NotStarted,
        }
    }

    /// Replace the name-token heuristic with another temporal predicate.
    pub fn with_temporal_predicate(mut self, predicate: impl TemporalPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Kind inference built from the configuration and predicate.
    pub fn kind_inference(&self) -> KindInference {
        KindInference::new(Arc::clone(&self.predicate), &self.config.null_tokens)
    }

    /// CSV/TSV source using this cleaner's parser settings and kind inference.
    pub fn csv_source(&self) -> CsvSource {
        CsvSource::new(self.config.parser.clone(), self.kind_inference())
    }

    /// Load a CSV/TSV file and clean it.
    pub fn clean_file(&mut self, path: impl AsRef<Path>) -> Result<CleanRun> {
        let source = self.csv_source();
        self.clean(&source, path)
    }

    /// Load from `source` and run every stage.
    pub fn clean(
        &mut self,
        source: &dyn TabularSource,
        location: impl AsRef<Path>,
    ) -> Result<CleanRun> {
        let location = location.as_ref();
        let span = info_span!("clean", location = %location.display());
        let _enter = span.enter();

        self.state = PipelineState::NotStarted;
        let (dataset, metadata) = match source.load(location) {
            Ok(loaded) => loaded,
            Err(err) => return Err(self.fail(err)),
        };

        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "loaded source"
        );
        self.run_stages(dataset, metadata)
    }

    /// Run every stage on an already-loaded dataset.
    pub fn clean_dataset(&mut self, dataset: Dataset, source: SourceMetadata) -> Result<CleanRun> {
        let span = info_span!("clean", location = %source.path.display());
        let _enter = span.enter();
        self.run_stages(dataset, source)
    }

    fn run_stages(&mut self, mut dataset: Dataset, source: SourceMetadata) -> Result<CleanRun> {
        self.state = PipelineState::Loaded;
        let rows_before = dataset.row_count();
        let mut report = ValidationReport::new();

        let coercer = TypeCoercer::new();
        let resolver = MissingValueResolver::new(self.config.missing_sentinel.clone());
        let deduplicator = DuplicateResolver::new();

        let stages: [(&dyn Stage, PipelineState); 3] = [
            (&coercer, PipelineState::Coerced),
            (&resolver, PipelineState::Filled),
            (&deduplicator, PipelineState::Deduplicated),
        ];

        for (stage, next) in stages {
            match stage.apply(&mut dataset) {
                Ok(outcome) => {
                    if outcome.corrected {
                        warn!(stage = stage.name(), affected = outcome.affected, "{}", outcome.summary);
                    } else {
                        info!(stage = stage.name(), "{}", outcome.summary);
                    }
                    report.push(outcome);
                    self.state = next;
                }
                Err(err) => return Err(self.fail(err)),
            }
        }

        self.state = PipelineState::Complete;
        let summary = RunSummary {
            rows_before,
            rows_after: dataset.row_count(),
            columns: dataset.column_count(),
            total_affected: report.total_affected(),
        };
        info!(
            rows_before = summary.rows_before,
            rows_after = summary.rows_after,
            "run complete"
        );

        Ok(CleanRun {
            source,
            dataset,
            report,
            summary,
        })
    }

    /// Hand a finished run's dataset to a sink.
    ///
    /// A write failure leaves `run` intact, so the write can be retried
    /// without cleaning again.
    pub fn write(
        &self,
        run: &CleanRun,
        sink: &dyn TabularSink,
        location: impl AsRef<Path>,
    ) -> Result<()> {
        let location = location.as_ref();
        sink.write(&run.dataset, location).inspect_err(|err| {
            error!(location = %location.display(), error = %err, "sink write failed");
        })?;
        info!(location = %location.display(), rows = run.dataset.row_count(), "wrote cleaned dataset");
        Ok(())
    }

    fn fail(&mut self, err: TabcleanError) -> TabcleanError {
        error!(from = %self.state, error = %err, "run failed");
        self.state = PipelineState::Failed;
        err
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
