//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use geosight_core::GeminiConfig;
use std::path::{Path, PathBuf};

pub mod analyze;
pub mod schema;
pub mod serve;

/// Estimate where a street-level photo was taken
#[derive(Parser)]
#[command(name = "geosight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to ./geosight.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate a single photo
    Analyze(analyze::AnalyzeArgs),

    /// Start the web interface
    Serve(serve::ServeArgs),

    /// Print the generation config sent to the model
    Schema,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.config.as_deref();

        match self.command {
            Commands::Analyze(args) => analyze::execute(args, config).await,
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Schema => schema::execute(),
        }
    }
}

/// Resolve the Gemini config, then apply flag overrides.
pub(crate) fn load_config(
    path: Option<&Path>,
    model: Option<&str>,
    language: Option<&str>,
) -> Result<GeminiConfig> {
    let mut config = GeminiConfig::load(path)?;
    if let Some(model) = model {
        config = config.with_model(model);
    }
    if let Some(language) = language {
        config = config.with_language(language);
    }
    Ok(config)
}
