//! Core domain logic for biathlon race results.
//!
//! This crate contains:
//! - Parsing: reading the race log and the race configuration
//! - Processing: folding events into per-competitor race state
//! - Reporting: ranking competitors and rendering the results table

pub mod clock;
mod competitor;
mod config;
pub mod event;
pub mod parse;
mod process;
pub mod report;

pub use competitor::{CompetitorState, SHOT_CAPACITY, Split, Status};
pub use config::{ConfigError, RaceConfig, RaceConfigFile};
pub use event::{CompetitorId, Event, EventKind};
pub use parse::{LineError, ParseError, ParsedLog, parse_event_line, parse_event_log};
pub use process::{Competitors, ProcessedRace, fold_events, process_events};
