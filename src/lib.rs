pub mod advice;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod intake;
pub mod knowledge;
pub mod models;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parse the command line, run it, and print the outcome.
pub fn run() -> ExitCode {
    // Logs go to stderr so stdout stays clean for --json output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cli = cli::Cli::parse();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match cli::execute(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
