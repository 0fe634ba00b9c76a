//! Integration tests for tabclean.

use std::io::Write;
use std::path::Path;

use tabclean::cleansing::{DuplicateResolver, MissingValueResolver, TypeCoercer};
use tabclean::{
    Cell, CleanRun, Cleaner, CleanerConfig, ColumnKind, Dataset, DelimitedSink, JsonSink,
    PipelineState, SourceMetadata, TabcleanError, TabularSink,
};
use tempfile::{NamedTempFile, TempDir};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn clean(content: &str) -> (Cleaner, tabclean::Result<CleanRun>) {
    let file = create_test_file(content);
    let mut cleaner = Cleaner::new();
    let result = cleaner.clean_file(file.path());
    (cleaner, result)
}

/// Sink that always fails, to exercise the retry path.
struct BrokenSink;

impl TabularSink for BrokenSink {
    fn write(&self, _dataset: &Dataset, location: &Path) -> tabclean::Result<()> {
        Err(TabcleanError::SinkWrite {
            path: location.to_path_buf(),
            message: "disk full".to_string(),
        })
    }
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[test]
fn test_signup_scenario() {
    let (cleaner, result) = clean(
        "id,signup_date\n\
         1,2023-01-05\n\
         2,not-a-date\n\
         1,2023-01-05\n",
    );
    let run = result.expect("Run failed");
    let ds = &run.dataset;

    assert_eq!(cleaner.state(), PipelineState::Complete);
    assert_eq!(ds.column_kind(0), Some(ColumnKind::Numeric));
    assert_eq!(ds.column_kind(1), Some(ColumnKind::Temporal));
    assert_eq!(ds.row_count(), 2);

    assert_eq!(ds.get_cell(0, 0), Some(&Cell::Number(1.0)));
    assert_eq!(ds.get_cell(0, 1).map(|c| c.to_string()), Some("2023-01-05".to_string()));
    assert_eq!(ds.get_cell(1, 0), Some(&Cell::Number(2.0)));
    // The unparseable date is filled with the textual sentinel, never a date.
    assert_eq!(ds.get_cell(1, 1), Some(&Cell::Placeholder("Unknown".to_string())));

    let report = &run.report;
    let stages: Vec<&str> = report.lines().iter().map(|(s, _)| *s).collect();
    assert_eq!(
        stages,
        vec![TypeCoercer::NAME, MissingValueResolver::NAME, DuplicateResolver::NAME]
    );
    assert_eq!(report.outcomes()[0].affected, 1);
    assert!(report.outcomes()[0]
        .summary
        .contains("1 cell in column 'signup_date' coerced to empty due to unparseable date"));
    assert_eq!(report.outcomes()[1].affected, 1);
    assert_eq!(report.outcomes()[2].affected, 1);
    assert_eq!(run.summary.rows_before, 3);
    assert_eq!(run.summary.rows_after, 2);
}

#[test]
fn test_numeric_fill_uses_mean() {
    let (_, result) = clean("name,score\na,10\nb,\nc,20\nd,NA\n");
    let run = result.expect("Run failed");

    assert_eq!(run.dataset.get_cell(1, 1), Some(&Cell::Number(15.0)));
    assert_eq!(run.dataset.get_cell(3, 1), Some(&Cell::Number(15.0)));
    assert_eq!(run.dataset.absent_count(), 0);
}

#[test]
fn test_fill_precedes_dedup() {
    // Rows 2 and 3 only become equal once their blanks are filled.
    let (_, result) = clean("city,score\nNYC,1\nLA,\nLA,2\n");
    let run = result.expect("Run failed");
    assert_eq!(run.dataset.row_count(), 3);

    let (_, result) = clean("city,score\nNYC,2\n,2\n,2\n");
    let run = result.expect("Run failed");
    assert_eq!(run.dataset.row_count(), 2);
    assert_eq!(
        run.dataset.get_cell(1, 0),
        Some(&Cell::Placeholder("Unknown".to_string()))
    );
}

#[test]
fn test_custom_sentinel_and_tokens() {
    let file = create_test_file("id,joined_on\n1,2024-03-01\n2,soon\n");
    let config = CleanerConfig {
        temporal_tokens: vec!["joined".to_string()],
        missing_sentinel: "MISSING".to_string(),
        ..Default::default()
    };
    let mut cleaner = Cleaner::with_config(config);
    let run = cleaner.clean_file(file.path()).expect("Run failed");

    assert_eq!(run.dataset.column_kind(1), Some(ColumnKind::Temporal));
    assert_eq!(
        run.dataset.get_cell(1, 1),
        Some(&Cell::Placeholder("MISSING".to_string()))
    );
}

#[test]
fn test_filled_sentinel_matches_literal_value() {
    let (_, result) = clean("city,score\nUnknown,1\n,1\n");
    let run = result.expect("Run failed");

    assert_eq!(run.dataset.row_count(), 1);
    let dedup = run
        .report
        .outcome(DuplicateResolver::NAME)
        .expect("Missing dedup outcome");
    assert_eq!(dedup.affected, 1);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    cleaner_write_csv(&run, &path);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "city,score\nUnknown,1\n");
}

#[test]
fn test_large_ids_are_not_merged() {
    let (_, result) = clean("id,name\n9007199254740992,x\n9007199254740993,x\n");
    let run = result.expect("Run failed");

    assert_eq!(run.dataset.column_kind(0), Some(ColumnKind::Textual));
    assert_eq!(run.dataset.row_count(), 2);
    assert_eq!(
        run.dataset.get_cell(1, 0),
        Some(&Cell::text("9007199254740993"))
    );
}

#[test]
fn test_mean_of_huge_values_is_finite() {
    let (_, result) = clean("label,big\na,1e308\nb,1e308\nc,\n");
    let run = result.expect("Run failed");

    assert_eq!(run.dataset.get_cell(2, 1), Some(&Cell::Number(1e308)));
    let fill = run
        .report
        .outcome(MissingValueResolver::NAME)
        .expect("Missing fill outcome");
    assert_eq!(fill.affected_in("big"), 1);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.json");
    Cleaner::new().write(&run, &JsonSink::new(), &path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value[2]["big"], serde_json::json!(1e308));
}

fn cleaner_write_csv(run: &CleanRun, path: &Path) {
    Cleaner::new()
        .write(run, &DelimitedSink::csv(), path)
        .expect("Write failed");
}

// =============================================================================
// Error Taxonomy
// =============================================================================

#[test]
fn test_all_absent_numeric_column_fails() {
    let (cleaner, result) = clean("id,score\n1,\n2,NA\n");
    let err = result.expect_err("Run should fail");

    assert!(matches!(
        err,
        TabcleanError::InsufficientData { ref column } if column == "score"
    ));
    assert_eq!(cleaner.state(), PipelineState::Failed);
}

#[test]
fn test_empty_source() {
    let (cleaner, result) = clean("");
    assert!(matches!(result, Err(TabcleanError::SourceEmpty(_))));
    assert_eq!(cleaner.state(), PipelineState::Failed);

    let (_, result) = clean("id,name\n");
    assert!(matches!(result, Err(TabcleanError::SourceEmpty(_))));
}

#[test]
fn test_missing_source() {
    let mut cleaner = Cleaner::new();
    let err = cleaner
        .clean_file("/no/such/dir/data.csv")
        .expect_err("Run should fail");

    assert!(matches!(err, TabcleanError::SourceUnavailable { .. }));
    assert!(err.user_message().contains("not found"));
    assert_eq!(cleaner.state(), PipelineState::Failed);
}

#[test]
fn test_malformed_source() {
    let (_, result) = clean("a,b\n1,2\n3,4,5\n");
    assert!(matches!(
        result,
        Err(TabcleanError::SourceMalformed { row: 3, .. })
    ));
}

#[test]
fn test_cleaner_resets_between_runs() {
    let mut cleaner = Cleaner::new();
    let bad = create_test_file("");
    assert!(cleaner.clean_file(bad.path()).is_err());
    assert_eq!(cleaner.state(), PipelineState::Failed);

    let good = create_test_file("a\n1\n");
    assert!(cleaner.clean_file(good.path()).is_ok());
    assert_eq!(cleaner.state(), PipelineState::Complete);
}

// =============================================================================
// Sink Hand-off
// =============================================================================

#[test]
fn test_write_after_run() {
    let (cleaner, result) = clean("id,visit_date,city\n1,01/31/2024,NYC\n2,,LA\n1,2024-01-31,NYC\n");
    let run = result.expect("Run failed");
    let dir = TempDir::new().unwrap();

    let csv_path = dir.path().join("out.csv");
    cleaner.write(&run, &DelimitedSink::csv(), &csv_path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        "id,visit_date,city\n1,2024-01-31,NYC\n2,Unknown,LA\n"
    );

    let json_path = dir.path().join("out.json");
    cleaner.write(&run, &JsonSink::pretty(), &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_sink_failure_keeps_run_for_retry() {
    let (cleaner, result) = clean("a,b\n1,x\n2,y\n");
    let run = result.expect("Run failed");
    let snapshot = run.dataset.clone();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.tsv");

    let err = cleaner.write(&run, &BrokenSink, &path).unwrap_err();
    assert!(matches!(err, TabcleanError::SinkWrite { .. }));
    assert_eq!(run.dataset, snapshot);
    assert_eq!(cleaner.state(), PipelineState::Complete);

    cleaner.write(&run, &DelimitedSink::tsv(), &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\tb\n1\tx\n2\ty\n");
}

#[test]
fn test_clean_in_memory_dataset() {
    let source = Cleaner::new().csv_source();
    let (ds, meta) = source
        .load_bytes("inline", b"k;v\nx;1\nx;1\n")
        .expect("Load failed");
    assert_eq!(meta.format, "csv-semicolon");

    let mut cleaner = Cleaner::new();
    let run = cleaner
        .clean_dataset(ds, SourceMetadata::in_memory("inline", &Dataset::default()))
        .expect("Run failed");
    assert_eq!(run.dataset.row_count(), 1);
    assert!(run.report.to_json().unwrap().contains("remove_duplicates"));
}
