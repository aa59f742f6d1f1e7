//! Results command.
//!
//! Reads the race log, narrates each event that took effect and renders the
//! final standings either as the fixed-width results table or as JSON.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use biathlon_core::{RaceConfig, fold_events, parse_event_log, report};

/// Output format for the standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Builds the complete command output for a race log.
pub fn format_results(
    config: &RaceConfig,
    log_text: &str,
    format: OutputFormat,
    with_log: bool,
) -> Result<String> {
    let log = parse_event_log(log_text);
    for skipped in &log.errors {
        tracing::warn!(line = skipped.line, error = %skipped.error, "skipping event line");
    }

    let race = fold_events(&log.events, config);
    let competitors = &race.competitors;
    tracing::debug!(
        events = log.events.len(),
        skipped = log.errors.len(),
        competitors = competitors.len(),
        "race log processed"
    );

    if format == OutputFormat::Json {
        let json = report::render_json(competitors, config).context("failed to encode results")?;
        return Ok(format!("{json}\n"));
    }

    let mut output = String::new();

    if with_log {
        for event in &race.applied {
            writeln!(output, "{event}")?;
        }
        writeln!(output)?;
        writeln!(output, "Resulting table")?;
    }
    for line in report::render(competitors, config) {
        writeln!(output, "{line}")?;
    }

    Ok(output)
}

/// Runs the results command, printing to stdout.
pub fn run(
    config: &RaceConfig,
    events_path: &Path,
    format: OutputFormat,
    with_log: bool,
) -> Result<()> {
    let bytes = std::fs::read(events_path)
        .with_context(|| format!("failed to open event file {}", events_path.display()))?;
    // Invalid UTF-8 only ever shows up in free-form comments.
    let log_text = String::from_utf8_lossy(&bytes);

    print!("{}", format_results(config, &log_text, format, with_log)?);
    Ok(())
}
