//! Vidlink CLI - Command-line interface
//!
//! Decodes saved API payloads and prints the derived state the client
//! would act on.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vidlink_core::tracing_setup::{CliLogLevel, init_tracing};

use crate::config::{CliConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "vidlink")]
#[command(about = "Inspect video platform API payloads")]
#[command(version)]
struct Cli {
    /// Output format (overrides VIDLINK_OUTPUT)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Console log level (overrides VIDLINK_LOG_LEVEL)
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Directory for the per-run debug log (overrides VIDLINK_LOG_DIR)
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env().with_overrides(cli.format, cli.log_level, cli.logs_dir);

    let log_file = init_tracing(
        config.logging.level.as_tracing_level(),
        config.logging.logs_dir.as_deref(),
    )
    .context("Failed to initialize logging")?;
    tracing::debug!(log_file = %log_file.display(), ?config, "Starting vidlink");

    commands::run_command(cli.command, &config.output).await
}
