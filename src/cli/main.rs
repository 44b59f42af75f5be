//! Background removal client CLI
//!
//! Drives the full workflow for one file: intake validation, encoding,
//! submission to the remote service, and export of the result.

use super::config::CliConfigBuilder;
use crate::{
    encoder,
    exporter::Exporter,
    remote::{self, HttpRemovalService},
    tracing_config::init_cli_tracing,
    types::format_size,
    validator,
    workflow::Workflow,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Remove the background from an image via a remote removal service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgstrip")]
pub struct Cli {
    /// Input image file (PNG or JPEG)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for the processed image [default: output.png]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Removal service endpoint URL
    #[arg(long, default_value = crate::config::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,

    /// Maximum accepted input size in bytes [default: 1 MiB]
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    let config = CliConfigBuilder::from_cli(&cli).context("Invalid CLI arguments")?;
    info!(endpoint = %config.endpoint, "starting background removal");

    let mut workflow = Workflow::new();

    // Intake: read, validate, install
    let candidate = encoder::read_candidate(&cli.input)
        .await
        .with_context(|| format!("Failed to read '{}'", cli.input.display()))?;
    let file = match validator::validate(vec![candidate], &[], &config.validation) {
        Ok(file) => file,
        Err(err) => {
            workflow.reject(err.user_message());
            anyhow::bail!("{}", err.user_message())
        },
    };
    println!("Selected: {}", file.display_label());
    let file_id = workflow.select(file);

    // Encoding completes before submission is offered
    let selected = workflow
        .selected_file()
        .context("workflow lost the selected file")?;
    let payload = encoder::encode(selected).await;
    workflow.attach_payload(file_id, payload);

    let service = HttpRemovalService::new(&config).context("Failed to create service client")?;

    let spinner = processing_spinner();
    let start_time = Instant::now();
    let reference = match remote::submit(&mut workflow, &service).await {
        Ok(reference) => {
            spinner.finish_and_clear();
            reference
        },
        Err(err) => {
            spinner.finish_and_clear();
            let message = workflow
                .error_message()
                .map_or_else(|| err.user_message(), ToString::to_string);
            anyhow::bail!("{message}");
        },
    };
    info!(elapsed = ?start_time.elapsed(), "removal completed");

    // Export
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_filename));
    let exporter = Exporter::new().context("Failed to create exporter")?;
    exporter
        .save(&reference, &output_path)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    let saved_size = tokio::fs::metadata(&output_path)
        .await
        .map(|m| format_size(m.len()))
        .unwrap_or_else(|_| "unknown size".to_string());
    println!("Saved {} ({})", output_path.display(), saved_size);

    Ok(())
}

fn processing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Removing background...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
