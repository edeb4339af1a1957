//! Single-photo analysis command.

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use geosight_core::{
    select_image, AnalysisStatus, GeminiClient, ImageFile, LocationAnalyzer, Session,
    SessionEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to the street-level photo
    pub image: PathBuf,

    /// Media type to send instead of the one inferred from the extension
    #[arg(long)]
    pub mime: Option<String>,

    /// Gemini model to use
    #[arg(long, env = "GEOSIGHT_MODEL")]
    pub model: Option<String>,

    /// Language for the text fields of the answer
    #[arg(long, env = "GEOSIGHT_LANGUAGE")]
    pub language: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Also print the model's thought process
    #[arg(long)]
    pub thoughts: bool,

    /// Exit on failure instead of offering a retry
    #[arg(long)]
    pub no_retry: bool,
}

pub async fn execute(args: AnalyzeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut file = ImageFile::from_path(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    if let Some(mime) = &args.mime {
        file.mime_type = mime.clone();
    }
    // Non-images stop here, before any config or network access.
    let image = select_image(file)?;

    let config = super::load_config(config_path, args.model.as_deref(), args.language.as_deref())?;
    let client = GeminiClient::new(config);

    if !args.json {
        println!(
            "{} Analyzing {} ({}, {} with {})",
            "→".dimmed(),
            image.file_name.bold(),
            image.mime_type,
            output::format_size(image.size_bytes),
            client.model()
        );
    }

    let mut session = Session::default().reduce(SessionEvent::ImageSelected(image));
    let session = loop {
        session = run_attempt(session, &client, args.json).await?;

        if session.status == AnalysisStatus::Success {
            break session;
        }

        let message = session
            .error
            .clone()
            .unwrap_or_else(|| "Analysis failed".to_string());
        if args.json || args.no_retry || !confirm_retry(&message)? {
            bail!(message);
        }
    };

    let result = session
        .result
        .as_ref()
        .ok_or_else(|| anyhow!("Session succeeded without a result"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        output::print_result(result, args.thoughts);
    }

    Ok(())
}

/// Drive one Analyzing cycle of the session.
async fn run_attempt(
    session: Session,
    analyzer: &dyn LocationAnalyzer,
    quiet: bool,
) -> Result<Session> {
    let session = session.reduce(SessionEvent::AnalyzeRequested);
    let (attempt, request) = session
        .pending_request()
        .ok_or_else(|| anyhow!("No image selected"))?;

    let spinner = (!quiet).then(analysis_spinner);
    let outcome = analyzer.analyze(request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let event = match outcome {
        Ok(result) => SessionEvent::AnalysisSucceeded { attempt, result },
        Err(e) => SessionEvent::AnalysisFailed {
            attempt,
            message: e.to_string(),
        },
    };
    Ok(session.reduce(event))
}

fn analysis_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
        spinner.set_style(style);
    }
    spinner.set_message("Reading the scene...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Ask whether to resend the same image. Never asks without a terminal.
fn confirm_retry(message: &str) -> Result<bool> {
    eprintln!("{} {}", "✗".red().bold(), message);

    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }

    Confirm::new()
        .with_prompt("Retry with the same image?")
        .default(true)
        .interact()
        .context("Failed to read answer")
}
