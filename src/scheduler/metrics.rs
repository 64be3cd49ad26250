//! Schedule compactness metrics.
//!
//! Computes the ranking indicators of a finalized schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Days | Distinct day indices used |
//! | Gaps | Sum of max(0, next start - previous end) within each day |
//! | Total | Sum of max(0, end - start) over all events |
//! | Earliest / Latest | Global min start / max end |
//! | Balance | max(events per day) - min(events per day) |
//! | Span | max(0, latest - earliest) |
//!
//! # Score
//! `days × 100 + gaps × 2 + span + balance × 20`. Lower is better.

use std::collections::BTreeMap;

use crate::models::{from_minutes, Event, ScheduleMetrics};

/// Weight of each used day.
pub const DAY_WEIGHT: i64 = 100;
/// Weight of each gap minute.
pub const GAP_WEIGHT: i64 = 2;
/// Weight of each unit of daily imbalance.
pub const BALANCE_WEIGHT: i64 = 20;

impl ScheduleMetrics {
    /// Computes metrics from a schedule's events.
    ///
    /// Events need not be sorted; each day's events are ordered by start
    /// before measuring gaps.
    pub fn calculate(events: &[Event]) -> Self {
        if events.is_empty() {
            return Self::default();
        }

        let mut per_day: BTreeMap<u8, Vec<&Event>> = BTreeMap::new();
        let mut earliest = i32::MAX;
        let mut latest = i32::MIN;
        let mut total_minutes: i64 = 0;

        for event in events {
            per_day.entry(event.day_index).or_default().push(event);
            earliest = earliest.min(event.start_minutes);
            latest = latest.max(event.end_minutes);
            total_minutes += event.duration_minutes();
        }

        let mut gaps: i64 = 0;
        let mut min_count = usize::MAX;
        let mut max_count = 0;

        for day_events in per_day.values_mut() {
            day_events.sort_by_key(|e| e.start_minutes);
            min_count = min_count.min(day_events.len());
            max_count = max_count.max(day_events.len());

            gaps += day_events
                .windows(2)
                .map(|pair| (i64::from(pair[1].start_minutes) - i64::from(pair[0].end_minutes)).max(0))
                .sum::<i64>();
        }

        let days_count = per_day.len();
        let balance = (max_count - min_count) as i64;
        let span = (i64::from(latest) - i64::from(earliest)).max(0);
        let score = days_count as i64 * DAY_WEIGHT + gaps * GAP_WEIGHT + span + balance * BALANCE_WEIGHT;

        Self {
            days_count,
            gaps,
            earliest: Some(from_minutes(earliest)),
            latest: Some(from_minutes(latest)),
            total_minutes,
            balance,
            span,
            score,
        }
    }
}
