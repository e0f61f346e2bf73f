//! `strcrypt`: line-oriented JSON front end for password-based string encryption.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`](config::Config) from environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Answer requests from stdin on stdout until EOF.
//!
//! The exit status is non-zero if any request failed.

mod config;
mod processor;
mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: strcrypt configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        default_iterations = cfg.default_iterations,
        "strcrypt starting"
    );

    // -----------------------------------------------------------------------
    // 3. Requests
    // -----------------------------------------------------------------------
    let summary = processor::run(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &cfg,
    )
    .await?;

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
