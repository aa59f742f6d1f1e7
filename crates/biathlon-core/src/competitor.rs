//! Per-competitor race state built up from the event log.

use chrono::{NaiveTime, TimeDelta};
use serde::Serialize;

use crate::config::RaceConfig;
use crate::event::{CompetitorId, Event, EventKind};

/// Shots available to every competitor.
pub const SHOT_CAPACITY: u32 = 5;

/// Finishing status of a competitor.
///
/// `NotFinished` is absorbing: once reached, no later transition leaves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    /// Nothing decided yet.
    #[default]
    Unset,
    Finished,
    NotStarted,
    NotFinished,
}

impl Status {
    /// Label used in the results table.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Finished => "[Finished]",
            Self::NotStarted => "[NotStarted]",
            Self::NotFinished => "[NotFinished]",
        }
    }

    /// Moves to `next` unless the competitor already cannot continue.
    pub const fn advance(&mut self, next: Self) {
        if !matches!(self, Self::NotFinished) {
            *self = next;
        }
    }
}

/// Duration and average speed of one timed segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub time: TimeDelta,
    /// Meters per second; `None` when the segment took no time.
    pub speed: Option<f64>,
}

impl Split {
    /// Builds a split for a segment of `distance` meters.
    pub fn new(distance: u32, time: TimeDelta) -> Self {
        Self {
            time,
            speed: speed(distance, time),
        }
    }
}

/// Accumulated race state for one competitor.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorState {
    pub id: CompetitorId,
    pub scheduled_start: Option<NaiveTime>,
    pub actual_start: Option<NaiveTime>,
    /// Start of the lap or penalty segment in progress.
    pub split_start: Option<NaiveTime>,
    pub hits: u32,
    pub shot_capacity: u32,
    pub penalty_time: TimeDelta,
    pub penalty_speed: Option<f64>,
    /// Completed laps, in order.
    pub laps: Vec<Split>,
    pub status: Status,
    pub comment: Option<String>,
}

impl CompetitorState {
    pub fn new(id: CompetitorId) -> Self {
        Self {
            id,
            scheduled_start: None,
            actual_start: None,
            split_start: None,
            hits: 0,
            shot_capacity: SHOT_CAPACITY,
            penalty_time: TimeDelta::zero(),
            penalty_speed: None,
            laps: Vec::new(),
            status: Status::Unset,
            comment: None,
        }
    }

    /// Applies one event to this competitor.
    ///
    /// Returns `false` when the event was ignored: a lap or penalty exit with
    /// no open split.
    pub fn apply(&mut self, event: &Event, config: &RaceConfig) -> bool {
        let at = event.occurred_at;
        match &event.kind {
            EventKind::Registered
            | EventKind::OnStartLine
            | EventKind::EnteredFiringRange { .. }
            | EventKind::LeftFiringRange => {}
            EventKind::ScheduledStartSet { scheduled_start } => {
                self.scheduled_start = Some(*scheduled_start);
            }
            EventKind::Started => {
                self.actual_start = Some(at);
                self.split_start = Some(at);
            }
            EventKind::TargetHit { .. } => self.hits += 1,
            EventKind::EnteredPenaltyLoop => self.split_start = Some(at),
            EventKind::LeftPenaltyLoop => {
                let Some(since) = self.split_start else {
                    tracing::debug!(competitor = self.id, "left penalty loop with no open split");
                    return false;
                };
                self.penalty_time += at - since;
                self.penalty_speed = if self.penalty_time > TimeDelta::zero() {
                    speed(config.penalty_len, self.penalty_time)
                } else {
                    None
                };
            }
            EventKind::LapCompleted => {
                let Some(since) = self.split_start else {
                    tracing::debug!(competitor = self.id, "lap completed with no open split");
                    return false;
                };
                self.laps.push(Split::new(config.lap_len, at - since));
                self.split_start = Some(at);
                self.status.advance(Status::Finished);
            }
            EventKind::CannotContinue { comment } => {
                self.status = Status::NotFinished;
                self.comment = Some(comment.clone());
            }
        }
        true
    }

    /// Durations of the completed laps.
    pub fn lap_times(&self) -> impl Iterator<Item = TimeDelta> + '_ {
        self.laps.iter().map(|lap| lap.time)
    }

    /// Average speeds of the completed laps.
    pub fn lap_speeds(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.laps.iter().map(|lap| lap.speed)
    }

    /// The penalty segment, if any penalty time was accumulated.
    pub fn penalty(&self) -> Option<Split> {
        (self.penalty_time > TimeDelta::zero()).then_some(Split {
            time: self.penalty_time,
            speed: self.penalty_speed,
        })
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "segment durations are far below 2^52 milliseconds"
)]
fn speed(distance: u32, time: TimeDelta) -> Option<f64> {
    let ms = time.num_milliseconds();
    (ms != 0).then(|| f64::from(distance) / (ms as f64 / 1000.0))
}
