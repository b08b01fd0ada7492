//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dns_probe` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use dns_probe::initialization::init_logger_with;
use dns_probe::{run_probe, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // A .env next to the working directory may set GEOLITE2_PATH
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config: Config = Opt::parse().into();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let output = config.output.clone();
    match run_probe(config).await {
        Ok(report) => {
            eprintln!(
                "Probed {} domain{} ({} succeeded, {} failed) in {:.1}s",
                report.total,
                if report.total == 1 { "" } else { "s" },
                report.succeeded,
                report.failed,
                report.elapsed_seconds
            );
            if let Some(path) = output {
                eprintln!("Results saved in {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("dns_probe error: {:#}", e);
            process::exit(1);
        }
    }
}
