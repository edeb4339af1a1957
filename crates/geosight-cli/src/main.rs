//! geosight - estimate where a street-level photo was taken.
//!
//! Sends the photo to a Gemini multimodal model and prints or serves the
//! structured location estimate.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

const DEFAULT_FILTER: &str = "geosight=info,geosight_core=info,geosight_web=debug";

/// Initialize tracing with optional file logging.
///
/// When `json_mode` is true, output goes to stderr with ANSI disabled so
/// stdout carries nothing but the JSON result.
fn init_tracing(log_file: Option<&Path>, json_mode: bool, verbose: bool) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "geosight=debug,geosight_core=debug,geosight_web=debug".into()
        } else {
            DEFAULT_FILTER.into()
        }
    });

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        // Console and file
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else if json_mode {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(args.log_path()),
        _ => None,
    };
    let json_mode = matches!(&cli.command, Commands::Analyze(args) if args.json);
    init_tracing(log_file.as_deref(), json_mode, cli.verbose)?;

    cli.execute().await
}
