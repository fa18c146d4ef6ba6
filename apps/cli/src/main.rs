//! # Fatura Entry Point
//!
//! Parses arguments, initializes logging and hands off to
//! [`fatura_cli::run`]. Results go to stdout; logs and errors to stderr.

use std::process::ExitCode;

use clap::Parser;
use fatura_cli::cli::Cli;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match fatura_cli::run(Cli::parse()).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = ?err.code, "{}", err.message);
            match serde_json::to_string(&err) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fatura=trace` - Show trace for fatura crates only
/// - Default: `info,fatura=debug,sqlx=warn`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,fatura=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
