//! workshelf CLI entry point

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use workshelf::config::{Cli, Settings};
use workshelf::pipeline;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Load and validate configuration before touching any folder
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Run the pipeline
    match pipeline::run(&settings) {
        Ok(summary) => {
            println!();
            if settings.dry_run {
                println!(
                    "Summary: {} planned, {} failed (of {} work folders)",
                    summary.planned, summary.failed, summary.discovered
                );
            } else {
                println!(
                    "Summary: {} organized, {} failed (of {} work folders)",
                    summary.organized, summary.failed, summary.discovered
                );
            }

            if summary.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
