//! Folds the race log into per-competitor state.
//!
//! Events are applied strictly in the order given. Nothing is re-sorted, so an
//! out-of-order log yields negative segment durations rather than an error.

use std::collections::BTreeMap;

use crate::competitor::CompetitorState;
use crate::config::RaceConfig;
use crate::event::{CompetitorId, Event};

/// Race state for every competitor seen in the log, keyed by id.
pub type Competitors = BTreeMap<CompetitorId, CompetitorState>;

/// Competitor state together with the events that took effect.
#[derive(Debug, Clone, Default)]
pub struct ProcessedRace<'a> {
    pub competitors: Competitors,
    /// Events that changed or confirmed state, in log order.
    ///
    /// Laps and penalty exits with no open split are left out.
    pub applied: Vec<&'a Event>,
}

/// Applies every event to the competitor it references.
///
/// A competitor is created on the first event that mentions it, even when
/// the event itself is then ignored.
pub fn fold_events<'a>(events: &'a [Event], config: &RaceConfig) -> ProcessedRace<'a> {
    let mut race = ProcessedRace::default();

    for event in events {
        let applied = race
            .competitors
            .entry(event.competitor_id)
            .or_insert_with(|| CompetitorState::new(event.competitor_id))
            .apply(event, config);
        if applied {
            race.applied.push(event);
        }
    }

    tracing::debug!(
        events = events.len(),
        applied = race.applied.len(),
        competitors = race.competitors.len(),
        "processed race log"
    );
    race
}

/// Folds the log and keeps only the competitor state.
pub fn process_events(events: &[Event], config: &RaceConfig) -> Competitors {
    fold_events(events, config).competitors
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, TimeDelta};

    use super::*;
    use crate::competitor::Status;
    use crate::event::EventKind;

    fn config() -> RaceConfig {
        RaceConfig {
            laps: 3,
            lap_len: 1000,
            penalty_len: 150,
            firing_lines: 1,
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            start_delta: TimeDelta::seconds(30),
        }
    }

    fn ev(time: &str, competitor_id: CompetitorId, kind: EventKind) -> Event {
        Event {
            occurred_at: crate::clock::parse_clock(time).unwrap(),
            competitor_id,
            kind,
        }
    }

    fn every_kind(id: CompetitorId) -> Vec<Event> {
        vec![
            ev("10:00:00.000", id, EventKind::Registered),
            ev(
                "10:00:01.000",
                id,
                EventKind::ScheduledStartSet {
                    scheduled_start: NaiveTime::from_hms_opt(10, 1, 0).unwrap(),
                },
            ),
            ev("10:00:50.000", id, EventKind::OnStartLine),
            ev("10:01:00.000", id, EventKind::Started),
            ev("10:02:00.000", id, EventKind::LapCompleted),
            ev(
                "10:02:10.000",
                id,
                EventKind::EnteredFiringRange {
                    firing_range: Some(1),
                },
            ),
            ev("10:02:11.000", id, EventKind::TargetHit { target: Some(1) }),
            ev("10:02:20.000", id, EventKind::LeftFiringRange),
            ev("10:02:30.000", id, EventKind::EnteredPenaltyLoop),
            ev("10:02:50.000", id, EventKind::LeftPenaltyLoop),
            ev("10:03:30.000", id, EventKind::LapCompleted),
            ev("10:03:40.000", id, EventKind::LapCompleted),
        ]
    }

    #[test]
    fn single_lap_scenario() {
        let events = vec![
            ev("10:00:00.000", 10, EventKind::Registered),
            ev(
                "10:01:00.000",
                10,
                EventKind::ScheduledStartSet {
                    scheduled_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                },
            ),
            ev("10:02:00.000", 10, EventKind::OnStartLine),
            ev("10:03:00.000", 10, EventKind::Started),
            ev(
                "10:04:00.000",
                10,
                EventKind::EnteredFiringRange { firing_range: None },
            ),
            ev("10:04:10.000", 10, EventKind::TargetHit { target: None }),
            ev("10:04:20.000", 10, EventKind::LeftFiringRange),
            ev("10:05:00.000", 10, EventKind::LapCompleted),
        ];

        let competitors = process_events(&events, &config());
        assert_eq!(competitors.len(), 1);

        let comp = &competitors[&10];
        assert_eq!(comp.id, 10);
        assert_eq!(
            comp.actual_start,
            Some(NaiveTime::from_hms_opt(10, 3, 0).unwrap())
        );
        assert_eq!(comp.laps.len(), 1);
        assert_eq!(comp.laps[0].time, TimeDelta::seconds(120));
        let speed = comp.laps[0].speed.unwrap();
        assert!((speed - 1000.0 / 120.0).abs() < 1e-9);
        assert_eq!(comp.hits, 1);
        assert_eq!(comp.status, Status::Finished);
    }

    #[test]
    fn penalty_scenario() {
        let events = vec![
            ev("10:00:00.000", 10, EventKind::Registered),
            ev("10:01:00.000", 10, EventKind::Started),
            ev("10:02:00.000", 10, EventKind::EnteredPenaltyLoop),
            ev("10:02:30.000", 10, EventKind::LeftPenaltyLoop),
            ev("10:03:00.000", 10, EventKind::LapCompleted),
        ];

        let competitors = process_events(&events, &config());
        let comp = &competitors[&10];

        assert_eq!(comp.penalty_time, TimeDelta::seconds(30));
        assert_eq!(comp.penalty_speed, Some(5.0));
    }

    #[test]
    fn interleaved_competitors_are_tracked_separately() {
        let events = vec![
            ev("10:00:00.000", 10, EventKind::Registered),
            ev("10:01:00.000", 10, EventKind::Started),
            ev("10:00:30.000", 20, EventKind::Registered),
            ev("10:01:30.000", 20, EventKind::Started),
            ev("10:02:00.000", 10, EventKind::LapCompleted),
            ev("10:02:30.000", 20, EventKind::LapCompleted),
        ];

        let competitors = process_events(&events, &config());
        assert_eq!(competitors.len(), 2);
        assert_eq!(competitors[&10].laps[0].time, TimeDelta::minutes(1));
        assert_eq!(competitors[&20].laps[0].time, TimeDelta::minutes(1));
    }

    #[test]
    fn lap_times_and_speeds_stay_parallel() {
        let mut events = every_kind(1);
        events.extend(every_kind(2));
        events.push(ev("10:05:00.000", 3, EventKind::LapCompleted));
        events.push(ev("10:05:00.000", 4, EventKind::LeftPenaltyLoop));

        for comp in process_events(&events, &config()).values() {
            assert_eq!(comp.lap_times().count(), comp.lap_speeds().count());
        }
    }

    #[test]
    fn cannot_continue_is_sticky() {
        let mut events = vec![
            ev("10:01:00.000", 7, EventKind::Started),
            ev("10:02:00.000", 7, EventKind::LapCompleted),
            ev(
                "10:02:30.000",
                7,
                EventKind::CannotContinue {
                    comment: "Broken ski".into(),
                },
            ),
        ];
        events.extend(every_kind(7));

        let competitors = process_events(&events, &config());
        let comp = &competitors[&7];
        assert_eq!(comp.status, Status::NotFinished);
        assert_eq!(comp.comment.as_deref(), Some("Broken ski"));
    }

    #[test]
    fn events_without_start_still_create_competitor() {
        let events = vec![ev("10:00:00.000", 42, EventKind::TargetHit { target: None })];

        let competitors = process_events(&events, &config());
        let comp = &competitors[&42];
        assert_eq!(comp.hits, 1);
        assert_eq!(comp.actual_start, None);
        assert_eq!(comp.status, Status::Unset);
    }

    #[test]
    fn ignored_events_are_not_reported_as_applied() {
        let events = vec![
            ev("10:40:00.000", 9, EventKind::LapCompleted),
            ev("10:41:00.000", 9, EventKind::LeftPenaltyLoop),
            ev("10:42:00.000", 9, EventKind::Started),
            ev("10:44:00.000", 9, EventKind::LapCompleted),
        ];

        let race = fold_events(&events, &config());

        let kinds: Vec<&EventKind> = race.applied.iter().map(|e| &e.kind).collect();
        assert_eq!(kinds, vec![&EventKind::Started, &EventKind::LapCompleted]);
        assert_eq!(race.competitors[&9].laps.len(), 1);
    }

    #[test]
    fn negative_ids_are_tracked() {
        let events = vec![ev("10:00:00.000", -3, EventKind::Registered)];
        let competitors = process_events(&events, &config());
        assert!(competitors.contains_key(&-3));
    }

    #[test]
    fn out_of_order_log_yields_negative_lap() {
        // The fold does not sort: a lap logged before its start is measured backwards.
        let events = vec![
            ev("10:05:00.000", 1, EventKind::Started),
            ev("10:03:00.000", 1, EventKind::LapCompleted),
        ];

        let competitors = process_events(&events, &config());
        let lap = competitors[&1].laps[0];
        assert_eq!(lap.time, TimeDelta::minutes(-2));
        assert!(lap.speed.unwrap() < 0.0);
    }
}
