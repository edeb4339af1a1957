//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use geosight_core::GeminiClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Log file used by `--log` when no path is given.
const DEFAULT_LOG_FILE: &str = "geosight-serve.log";

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path used with --log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path, None, None)?;
    let client = GeminiClient::new(config);
    let model = client.model().to_string();

    println!();
    println!("  {} {}", "Geosight".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}  http://{}:{}", "Interface".green(), args.host, args.port);
    println!("  {}        http://{}:{}/api", "API".green(), args.host, args.port);
    println!("  {}      {}", "Model".green(), model);
    if args.log {
        println!("  {}       {}", "Log".green(), args.log_path().display());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    geosight_web::run_server(Arc::new(client), &args.host, args.port).await?;

    Ok(())
}
