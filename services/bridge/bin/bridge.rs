//! Main Entrypoint for the Study Bridge
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging on stderr (stdout carries the protocol).
//! 3. Building the Gemini model client.
//! 4. Running either the command bridge or the interactive study console.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use study_bridge::{bridge::Bridge, config::Config, study::StudyConsole};
use study_core::{GeminiClient, ModelClient};
use tokio::io::{BufReader, stdin, stdout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Study assistant backed by a Gemini model")]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Serve line-delimited JSON commands on stdin/stdout (default).
    Bridge,
    /// Study interactively in the terminal.
    Study,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    for warning in &config.warnings {
        warn!("{warning}");
    }

    // --- 3. Initialize the Model Client ---
    let model: Arc<dyn ModelClient> = Arc::new(GeminiClient::new(
        config.gemini_api_key,
        config.base_url,
        config.model.clone(),
    ));

    // --- 4. Run ---
    let mode = cli.mode.unwrap_or(Mode::Bridge);
    info!(?mode, model = %config.model, "Study bridge configured. Starting...");
    match mode {
        Mode::Bridge => {
            Bridge::new(model)
                .run(BufReader::new(stdin()), &mut stdout())
                .await?
        }
        Mode::Study => {
            StudyConsole::new(model, BufReader::new(stdin()), stdout())
                .run()
                .await?
        }
    }

    info!("Study bridge has shut down.");
    Ok(())
}
