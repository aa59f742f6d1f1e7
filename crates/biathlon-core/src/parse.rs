//! Race log parsing.
//!
//! Each non-empty line has the shape
//! `[HH:MM:SS.mmm] <event code> <competitor id> [extra...]`. A line that fails
//! to parse is recorded and skipped; the rest of the log is still read.
//! Only truly empty lines are skipped silently; a line of whitespace is a
//! format error like any other malformed line.
//!
//! Event codes outside 1..=11 are rejected here, so such a line never reaches
//! the fold and does not create a competitor on its own. A competitor that
//! appears only on unknown-code lines is therefore absent from the results.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::clock::{ClockError, parse_clock};
use crate::event::{CompetitorId, Event, EventKind};

/// Splits a line into its bracketed time and the remaining fields.
static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<time>[^\]]*)\](?P<rest>.*)$").unwrap());

/// Errors for a single log line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid event line format: {0:?}")]
    Format(String),

    #[error("invalid event time: {0}")]
    Time(#[source] ClockError),

    #[error("invalid number of event fields: {0:?}")]
    MissingFields(String),

    #[error("invalid event code {0:?}")]
    EventCode(String),

    #[error("unknown event code {0}")]
    UnknownEventCode(u32),

    #[error("invalid competitor id {0:?}")]
    CompetitorId(String),

    #[error("missing start time for event code 2")]
    MissingScheduledStart,

    #[error("invalid scheduled start time: {0}")]
    ScheduledStart(#[source] ClockError),

    #[error("invalid firing range {0:?}")]
    FiringRange(String),

    #[error("invalid target id {0:?}")]
    Target(String),
}

/// A line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number in the log.
    pub line: usize,
    pub error: ParseError,
}

/// Result of reading a whole log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    /// Events in log order.
    pub events: Vec<Event>,
    /// Lines that were skipped.
    pub errors: Vec<LineError>,
}

/// Parses a complete race log, skipping blank and malformed lines.
pub fn parse_event_log(input: &str) -> ParsedLog {
    let mut log = ParsedLog::default();

    for (idx, line) in input.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        match parse_event_line(line) {
            Ok(event) => log.events.push(event),
            Err(error) => {
                tracing::debug!(line = idx + 1, %error, "skipping malformed event line");
                log.errors.push(LineError {
                    line: idx + 1,
                    error,
                });
            }
        }
    }

    log
}

/// Parses a single race log line.
pub fn parse_event_line(line: &str) -> Result<Event, ParseError> {
    let line = line.trim_end();
    let Some(caps) = LINE_RE.captures(line) else {
        return Err(ParseError::Format(line.to_string()));
    };

    let occurred_at = parse_clock(&caps["time"]).map_err(ParseError::Time)?;

    let fields: Vec<&str> = caps["rest"].split_whitespace().collect();
    let [code, competitor, extra @ ..] = fields.as_slice() else {
        return Err(ParseError::MissingFields(line.to_string()));
    };

    let code: u32 = code
        .parse()
        .map_err(|_| ParseError::EventCode((*code).to_string()))?;
    let competitor_id: CompetitorId = competitor
        .parse()
        .map_err(|_| ParseError::CompetitorId((*competitor).to_string()))?;

    let kind = match code {
        1 => EventKind::Registered,
        2 => {
            let raw = extra.first().ok_or(ParseError::MissingScheduledStart)?;
            EventKind::ScheduledStartSet {
                scheduled_start: parse_clock(raw).map_err(ParseError::ScheduledStart)?,
            }
        }
        3 => EventKind::OnStartLine,
        4 => EventKind::Started,
        5 => EventKind::EnteredFiringRange {
            firing_range: parse_optional(extra.first(), ParseError::FiringRange)?,
        },
        6 => EventKind::TargetHit {
            target: parse_optional(extra.first(), ParseError::Target)?,
        },
        7 => EventKind::LeftFiringRange,
        8 => EventKind::EnteredPenaltyLoop,
        9 => EventKind::LeftPenaltyLoop,
        10 => EventKind::LapCompleted,
        11 => EventKind::CannotContinue {
            comment: extra.join(" "),
        },
        other => return Err(ParseError::UnknownEventCode(other)),
    };

    Ok(Event {
        occurred_at,
        competitor_id,
        kind,
    })
}

fn parse_optional(
    raw: Option<&&str>,
    err: fn(String) -> ParseError,
) -> Result<Option<u32>, ParseError> {
    raw.map(|s| s.parse().map_err(|_| err((*s).to_string())))
        .transpose()
}
