//! Final results table.
//!
//! Ranking rules:
//! 1. Finished competitors with a recorded start, fastest total time first
//! 2. Finished competitors without a recorded start
//! 3. Everyone else, except those who never started
//! 4. Competitors who never started
//!
//! Remaining ties break on ascending competitor id.

use chrono::TimeDelta;
use serde::Serialize;

use crate::clock::format_duration;
use crate::competitor::{CompetitorState, Split, Status};
use crate::config::RaceConfig;
use crate::event::CompetitorId;
use crate::process::Competitors;

/// A competitor's place in the results.
#[derive(Debug, Clone)]
pub struct Standing<'a> {
    /// 1-based position in the table.
    pub position: usize,
    /// Status after finalization.
    pub status: Status,
    pub total: TimeDelta,
    pub competitor: &'a CompetitorState,
}

impl Standing<'_> {
    const fn tier(&self) -> u8 {
        match self.status {
            Status::Finished if self.competitor.actual_start.is_some() => 0,
            Status::Finished => 1,
            Status::NotStarted => 3,
            Status::Unset | Status::NotFinished => 2,
        }
    }
}

/// Derives the status shown in the results.
pub fn final_status(competitor: &CompetitorState) -> Status {
    match competitor.status {
        Status::NotFinished => Status::NotFinished,
        current if competitor.actual_start.is_some() => {
            if current == Status::Unset {
                Status::Finished
            } else {
                current
            }
        }
        _ if competitor.scheduled_start.is_some() => Status::NotStarted,
        current => current,
    }
}

/// Total race time: laps, penalty loops, and any late start.
pub fn total_time(competitor: &CompetitorState) -> TimeDelta {
    let mut total = competitor.lap_times().sum::<TimeDelta>() + competitor.penalty_time;

    if let (Some(scheduled), Some(actual)) = (competitor.scheduled_start, competitor.actual_start)
    {
        let late = actual - scheduled;
        if late > TimeDelta::zero() {
            total += late;
        }
    }

    total
}

/// Orders all competitors into the results table.
pub fn rank(competitors: &Competitors) -> Vec<Standing<'_>> {
    let mut standings: Vec<Standing<'_>> = competitors
        .values()
        .map(|competitor| Standing {
            position: 0,
            status: final_status(competitor),
            total: total_time(competitor),
            competitor,
        })
        .collect();

    standings.sort_by_key(|s| {
        let tier = s.tier();
        let time = if tier == 0 { s.total } else { TimeDelta::zero() };
        (tier, time, s.competitor.id)
    });

    for (i, standing) in standings.iter_mut().enumerate() {
        standing.position = i + 1;
    }
    standings
}

/// The `index`-th completed lap, if recorded.
fn lap(competitor: &CompetitorState, index: u32) -> Option<Split> {
    usize::try_from(index)
        .ok()
        .and_then(|i| competitor.laps.get(i))
        .copied()
}

fn format_split(split: Option<Split>) -> String {
    match split {
        None => "{,}".to_string(),
        Some(Split { time, speed }) => {
            let speed = speed.map_or_else(String::new, |v| format!("{v:.3}"));
            format!("{{{}, {speed}}}", format_duration(time))
        }
    }
}

/// Formats one row of the results table.
pub fn format_line(standing: &Standing<'_>, config: &RaceConfig) -> String {
    let competitor = standing.competitor;

    let laps = (0..config.laps)
        .map(|i| format_split(lap(competitor, i)))
        .collect::<Vec<_>>()
        .join(", ");
    let penalty = format_split(competitor.penalty());

    format!(
        "{:<12} {:>2}  [{laps}] {penalty}  {}/{}",
        standing.status.label(),
        competitor.id,
        competitor.hits,
        competitor.shot_capacity
    )
}

/// Renders the results table, one line per competitor in rank order.
pub fn render(competitors: &Competitors, config: &RaceConfig) -> Vec<String> {
    rank(competitors)
        .iter()
        .map(|standing| format_line(standing, config))
        .collect()
}

// ========== JSON Output ==========

/// JSON split structure.
#[derive(Debug, Serialize)]
pub struct JsonSplit {
    pub time: String,
    pub time_ms: i64,
    pub speed: Option<f64>,
}

/// JSON results row.
#[derive(Debug, Serialize)]
pub struct JsonStanding {
    pub position: usize,
    pub competitor_id: CompetitorId,
    pub status: Status,
    pub total_ms: i64,
    pub laps: Vec<Option<JsonSplit>>,
    pub penalty: Option<JsonSplit>,
    pub hits: u32,
    pub shots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<Split> for JsonSplit {
    fn from(split: Split) -> Self {
        Self {
            time: format_duration(split.time),
            time_ms: split.time.num_milliseconds(),
            speed: split.speed,
        }
    }
}

/// Builds the structured results in rank order.
pub fn standings_json(competitors: &Competitors, config: &RaceConfig) -> Vec<JsonStanding> {
    rank(competitors)
        .into_iter()
        .map(|standing| {
            let competitor = standing.competitor;
            JsonStanding {
                position: standing.position,
                competitor_id: competitor.id,
                status: standing.status,
                total_ms: standing.total.num_milliseconds(),
                laps: (0..config.laps)
                    .map(|i| lap(competitor, i).map(JsonSplit::from))
                    .collect(),
                penalty: competitor.penalty().map(JsonSplit::from),
                hits: competitor.hits,
                shots: competitor.shot_capacity,
                comment: competitor.comment.clone(),
            }
        })
        .collect()
}

/// Formats the results as pretty-printed JSON.
pub fn render_json(
    competitors: &Competitors,
    config: &RaceConfig,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&standings_json(competitors, config))
}
