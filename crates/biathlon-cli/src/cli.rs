//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Biathlon race results.
///
/// Reads a race configuration and a competition event log, narrates every
/// event and prints the final results table.
#[derive(Debug, Parser)]
#[command(name = "biathlon", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the race configuration (JSON).
    #[arg(short, long, default_value = "configs/config.json")]
    pub config: PathBuf,

    /// Path to the race event log.
    #[arg(short, long, default_value = "events")]
    pub events: PathBuf,

    /// Print the results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Do not print the per-event output log.
    #[arg(short, long)]
    pub quiet_log: bool,
}
