use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use biathlon_cli::commands::results::{self, OutputFormat};
use biathlon_cli::{Cli, load_race_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = load_race_config(&cli.config).context("failed to load race configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    results::run(&config, &cli.events, format, !cli.quiet_log)
}
