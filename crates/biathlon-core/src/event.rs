//! Race events as recorded in the competition log.

use std::fmt;

use chrono::NaiveTime;

use crate::clock::format_clock;

/// Competitor bib number.
///
/// Signed: the log format only requires an integer.
pub type CompetitorId = i32;

/// A single entry of the race log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// When the event occurred.
    pub occurred_at: NaiveTime,
    /// The competitor the event refers to.
    pub competitor_id: CompetitorId,
    /// What happened.
    pub kind: EventKind,
}

/// What happened to a competitor.
///
/// Each variant carries only the payload its log line may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The competitor registered.
    Registered,
    /// The start draw assigned a scheduled start time.
    ScheduledStartSet { scheduled_start: NaiveTime },
    /// The competitor is on the start line.
    OnStartLine,
    /// The competitor has started.
    Started,
    /// The competitor entered a firing range.
    EnteredFiringRange { firing_range: Option<u32> },
    /// A target was hit.
    TargetHit { target: Option<u32> },
    /// The competitor left the firing range.
    LeftFiringRange,
    /// The competitor entered the penalty loop.
    EnteredPenaltyLoop,
    /// The competitor left the penalty loop.
    LeftPenaltyLoop,
    /// The competitor ended a main lap.
    LapCompleted,
    /// The competitor cannot continue.
    CannotContinue { comment: String },
}

impl EventKind {
    /// Numeric code used for this kind in the race log.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Registered => 1,
            Self::ScheduledStartSet { .. } => 2,
            Self::OnStartLine => 3,
            Self::Started => 4,
            Self::EnteredFiringRange { .. } => 5,
            Self::TargetHit { .. } => 6,
            Self::LeftFiringRange => 7,
            Self::EnteredPenaltyLoop => 8,
            Self::LeftPenaltyLoop => 9,
            Self::LapCompleted => 10,
            Self::CannotContinue { .. } => 11,
        }
    }
}

/// Renders the output-log narration for the event.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = format_clock(self.occurred_at);
        let id = self.competitor_id;
        match &self.kind {
            EventKind::Registered => write!(f, "[{at}] Competitor({id}) has registered"),
            EventKind::ScheduledStartSet { scheduled_start } => write!(
                f,
                "[{at}] Scheduled start time for Competitor({id}) is {} (by draw)",
                format_clock(*scheduled_start)
            ),
            EventKind::OnStartLine => write!(f, "[{at}] Competitor({id}) is on the start line"),
            EventKind::Started => write!(f, "[{at}] Competitor({id}) has started"),
            EventKind::EnteredFiringRange { firing_range } => match firing_range {
                Some(range) => write!(
                    f,
                    "[{at}] Competitor({id}) entered the firing range({range})"
                ),
                None => write!(f, "[{at}] Competitor({id}) entered the firing range"),
            },
            EventKind::TargetHit { target } => match target {
                Some(target) => write!(f, "[{at}] Target({target}) was hit by Competitor({id})"),
                None => write!(f, "[{at}] Target was hit by Competitor({id})"),
            },
            EventKind::LeftFiringRange => {
                write!(f, "[{at}] Competitor({id}) left the firing range")
            }
            EventKind::EnteredPenaltyLoop => {
                write!(f, "[{at}] Competitor({id}) entered the penalty lap")
            }
            EventKind::LeftPenaltyLoop => {
                write!(f, "[{at}] Competitor({id}) left the penalty lap")
            }
            EventKind::LapCompleted => write!(f, "[{at}] Competitor({id}) finished a lap"),
            EventKind::CannotContinue { comment } => {
                write!(f, "[{at}] Competitor({id}) cannot continue: {comment}")
            }
        }
    }
}
