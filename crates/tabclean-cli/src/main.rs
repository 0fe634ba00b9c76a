//! tabclean CLI - validate and cleanse tabular datasets.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::LogConfig;

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone());
    if let Err(e) = logging::init_logging(&log_config) {
        eprintln!("Error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Clean {
            file,
            output,
            format,
            report,
            config,
            sentinel,
            date_tokens,
        } => commands::clean::run(commands::clean::CleanArgs {
            file,
            output,
            format,
            report,
            config,
            sentinel,
            date_tokens,
        }),

        Commands::Inspect { file, config, json } => commands::inspect::run(file, config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
