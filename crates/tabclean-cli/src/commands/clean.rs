//! Clean command - run the full pipeline and write the cleaned dataset.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tabclean::{CleanRun, Cleaner, DelimitedSink, JsonSink, TabularSink};

use super::{load_config, user_error};
use crate::cli::OutputFormat;

pub struct CleanArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub report: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sentinel: Option<String>,
    pub date_tokens: Vec<String>,
}

pub fn run(args: CleanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref()).map_err(user_error)?;
    if let Some(sentinel) = args.sentinel {
        config.missing_sentinel = sentinel;
    }
    if !args.date_tokens.is_empty() {
        config.temporal_tokens = args.date_tokens;
    }
    config.validate().map_err(user_error)?;

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        args.file.display().to_string().white()
    );

    let mut cleaner = Cleaner::with_config(config);
    let run = cleaner.clean_file(&args.file).map_err(user_error)?;

    print_report(&run);

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.file, args.format));
    let sink = sink_for(args.format);
    cleaner
        .write(&run, sink.as_ref(), &output_path)
        .map_err(user_error)?;

    if let Some(report_path) = args.report {
        std::fs::write(&report_path, run.report.to_json()?)?;
        println!(
            "{} report to {}",
            "Wrote".green(),
            report_path.display().to_string().white()
        );
    }

    println!(
        "{} {} rows to {}",
        "Wrote".green().bold(),
        run.summary.rows_after.to_string().white().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}

fn sink_for(format: OutputFormat) -> Box<dyn TabularSink> {
    match format {
        OutputFormat::Csv => Box::new(DelimitedSink::csv()),
        OutputFormat::Tsv => Box::new(DelimitedSink::tsv()),
        OutputFormat::Json => Box::new(JsonSink::pretty()),
    }
}

/// `<stem>_clean.<ext>` beside the input.
fn default_output_path(file: &Path, format: OutputFormat) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_clean.{}", stem, format.extension()))
}

fn print_report(run: &CleanRun) {
    println!();
    for outcome in run.report.outcomes() {
        let marker = if outcome.corrected {
            "●".yellow()
        } else {
            "○".green()
        };
        println!("  {} {}: {}", marker, outcome.stage.bold(), outcome.summary);
        for effect in &outcome.columns {
            println!("      {}", effect.note.dimmed());
        }
    }
    println!();

    let summary = &run.summary;
    println!(
        "{} {} → {} rows, {} columns, {} changes",
        "Summary:".cyan().bold(),
        summary.rows_before,
        summary.rows_after.to_string().white().bold(),
        summary.columns,
        summary.total_affected.to_string().yellow()
    );
}
