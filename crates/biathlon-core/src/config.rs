//! Race configuration record.

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{ClockError, format_clock, parse_clock, parse_offset};

/// Errors converting a configuration file into a [`RaceConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The `start` field is not a valid `HH:MM:SS.mmm` time.
    #[error("invalid time format for start: {0}")]
    Start(#[source] ClockError),

    /// The `startDelta` field is not a valid `HH:MM:SS` offset.
    #[error("invalid format for startDelta: {0}")]
    StartDelta(#[source] ClockError),
}

/// Race parameters shared by every competitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RaceConfigFile", into = "RaceConfigFile")]
pub struct RaceConfig {
    /// Number of main laps.
    pub laps: u32,
    /// Length of one main lap in meters.
    pub lap_len: u32,
    /// Length of one penalty lap in meters.
    pub penalty_len: u32,
    /// Number of firing lines per lap.
    pub firing_lines: u32,
    /// Planned start time of the race.
    pub start: NaiveTime,
    /// Planned interval between starts.
    pub start_delta: TimeDelta,
}

/// The configuration as written on disk.
///
/// Aliases accept the lowercased keys produced by environment overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfigFile {
    pub laps: u32,
    #[serde(alias = "laplen")]
    pub lap_len: u32,
    #[serde(alias = "penaltylen")]
    pub penalty_len: u32,
    #[serde(alias = "firinglines")]
    pub firing_lines: u32,
    pub start: String,
    #[serde(alias = "startdelta")]
    pub start_delta: String,
}

impl TryFrom<RaceConfigFile> for RaceConfig {
    type Error = ConfigError;

    fn try_from(file: RaceConfigFile) -> Result<Self, Self::Error> {
        Ok(Self {
            laps: file.laps,
            lap_len: file.lap_len,
            penalty_len: file.penalty_len,
            firing_lines: file.firing_lines,
            start: parse_clock(&file.start).map_err(ConfigError::Start)?,
            start_delta: parse_offset(&file.start_delta).map_err(ConfigError::StartDelta)?,
        })
    }
}

impl From<RaceConfig> for RaceConfigFile {
    fn from(config: RaceConfig) -> Self {
        let secs = config.start_delta.num_seconds();
        Self {
            laps: config.laps,
            lap_len: config.lap_len,
            penalty_len: config.penalty_len,
            firing_lines: config.firing_lines,
            start: format_clock(config.start),
            start_delta: format!(
                "{:02}:{:02}:{:02}",
                secs / 3600,
                secs % 3600 / 60,
                secs % 60
            ),
        }
    }
}
