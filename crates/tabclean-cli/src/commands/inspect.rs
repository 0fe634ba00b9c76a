//! Inspect command - show inferred column kinds without cleaning.

use std::path::PathBuf;

use colored::Colorize;
use tabclean::{Cleaner, ColumnKind, TabularSource};

use super::{load_config, user_error};

pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref()).map_err(user_error)?;
    let cleaner = Cleaner::with_config(config);
    let (dataset, source) = cleaner.csv_source().load(&file).map_err(user_error)?;

    if json_output {
        let columns: Vec<_> = dataset
            .columns()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "kind": c.kind,
                    "absent": c.absent_count(),
                })
            })
            .collect();
        let status = serde_json::json!({
            "source": source,
            "rows": dataset.row_count(),
            "absent_cells": dataset.absent_count(),
            "columns": columns,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns, {})",
        "Inspecting".cyan().bold(),
        source.file.white(),
        dataset.row_count(),
        dataset.column_count(),
        source.format
    );
    println!();

    for column in dataset.columns() {
        let kind = match column.kind {
            ColumnKind::Numeric => column.kind.label().blue(),
            ColumnKind::Temporal => column.kind.label().magenta(),
            ColumnKind::Textual => column.kind.label().normal(),
        };
        let absent = column.absent_count();
        let absent = if absent > 0 {
            format!("{} absent", absent).yellow()
        } else {
            "complete".green()
        };
        println!("  {:<24} {:<10} {}", column.name, kind, absent);
    }

    Ok(())
}
