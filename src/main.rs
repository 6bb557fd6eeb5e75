//! song-splitter CLI entry point

use clap::Parser;
use song_splitter::config::{Cli, Settings};
use song_splitter::error::SplitterError;
use song_splitter::pipeline;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Build settings from CLI
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => return report_error(&e),
    };

    // Run the pipeline; separation failures are reported inside and still exit 0
    match pipeline::run(&settings) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
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

fn report_error(err: &SplitterError) -> ExitCode {
    match err {
        SplitterError::Usage => println!("{}", err),
        SplitterError::InputNotFound(_) => println!("✗ {}", err),
        SplitterError::MissingDecoder { .. } => println!("⚠ {}", err),
        e if e.is_environment_error() => eprintln!("Environment not ready: {}", e),
        _ => eprintln!("Fatal error: {}", err),
    }
    ExitCode::from(err.exit_code())
}
