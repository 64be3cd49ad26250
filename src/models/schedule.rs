//! Schedule (solution) model.
//!
//! A schedule is one complete combination: the chosen option events of every
//! unit plus all mandatory events, ordered by day and start time, together
//! with its ranking metrics.
//!
//! Schedules are value objects recomputed per request; the key string is
//! their only identity.

use serde::{Deserialize, Serialize};

use super::event::{dedup_by_signature, has_overlap, sort_chronologically, Event};

/// A finalized schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Schedule key (e.g. "Auto 001", or a spreadsheet ID).
    pub key: String,
    /// Deduplicated events sorted by (day index, start minutes).
    pub events: Vec<Event>,
    /// Ranking metrics of `events`.
    pub metrics: ScheduleMetrics,
}

/// Compactness metrics of a schedule.
///
/// All durations are in minutes. An empty schedule has all-zero metrics and
/// no `earliest`/`latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetrics {
    /// Number of distinct days with at least one event.
    pub days_count: usize,
    /// Sum of idle time between consecutive events of the same day.
    pub gaps: i64,
    /// Earliest start across all events, "HH:MM".
    pub earliest: Option<String>,
    /// Latest end across all events, "HH:MM".
    pub latest: Option<String>,
    /// Sum of event durations.
    pub total_minutes: i64,
    /// Busiest day's event count minus quietest day's.
    pub balance: i64,
    /// Latest end minus earliest start, never negative.
    pub span: i64,
    /// Ranking score; lower is better.
    pub score: i64,
}

impl Schedule {
    /// Finalizes a schedule from raw events.
    ///
    /// Deduplicates by signature (last write wins), sorts chronologically and
    /// computes metrics.
    pub fn from_events(key: impl Into<String>, events: Vec<Event>) -> Self {
        let mut events = dedup_by_signature(events);
        sort_chronologically(&mut events);
        let metrics = ScheduleMetrics::calculate(&events);

        Self {
            key: key.into(),
            events,
            metrics,
        }
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Events of a given unit.
    pub fn events_for_unit(&self, unit: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.unit == unit).collect()
    }

    /// Events on a given day index.
    pub fn events_on_day(&self, day_index: u8) -> Vec<&Event> {
        self.events.iter().filter(|e| e.day_index == day_index).collect()
    }

    /// Option code chosen for a unit's component, if any.
    pub fn chosen_option(&self, unit: &str, class_type: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|e| !e.mandatory && e.unit == unit && e.class_type == class_type)
            .map(|e| e.option_code.as_str())
    }

    /// Whether any two events collide.
    pub fn has_conflicts(&self) -> bool {
        has_overlap(&self.events)
    }
}
