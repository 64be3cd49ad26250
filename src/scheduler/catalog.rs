//! Catalog building.
//!
//! Turns any labeled row set (search output, a parsed spreadsheet, free
//! text) into ranked schedules and a per-unit option catalog.
//!
//! The builder trusts its input: overlaps inside a schedule are not
//! re-validated here.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{
    sort_chronologically, Catalog, Event, EventSignature, Row, Schedule, Unit, UnitOption,
};

/// Builds [`Catalog`]s from labeled rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBuilder;

/// Insertion-ordered map of events keyed by signature (last write wins,
/// first position kept).
#[derive(Debug, Default)]
struct EventSet {
    events: Vec<Event>,
    positions: HashMap<EventSignature, usize>,
}

impl EventSet {
    fn insert(&mut self, event: Event) {
        match self.positions.entry(event.signature()) {
            Entry::Occupied(slot) => self.events[*slot.get()] = event,
            Entry::Vacant(slot) => {
                slot.insert(self.events.len());
                self.events.push(event);
            }
        }
    }

    fn into_sorted(self) -> Vec<Event> {
        let mut events = self.events;
        sort_chronologically(&mut events);
        events
    }
}

#[derive(Debug, Default)]
struct UnitAccumulator {
    mandatory: EventSet,
    options: Vec<(String, EventSet)>,
    option_index: HashMap<String, usize>,
}

impl UnitAccumulator {
    fn option_mut(&mut self, code: &str) -> &mut EventSet {
        let index = match self.option_index.get(code) {
            Some(&index) => index,
            None => {
                self.options.push((code.to_string(), EventSet::default()));
                self.option_index.insert(code.to_string(), self.options.len() - 1);
                self.options.len() - 1
            }
        };
        &mut self.options[index].1
    }

    fn finish(self, name: String) -> Unit {
        let mut options: Vec<UnitOption> = self
            .options
            .into_iter()
            .map(|(code, events)| UnitOption {
                code,
                events: events.into_sorted(),
            })
            .collect();
        options.sort_by(|a, b| a.code.cmp(&b.code));

        Unit {
            name,
            mandatory_events: self.mandatory.into_sorted(),
            options,
        }
    }
}

impl CatalogBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds the catalog in a single pass over `rows`.
    ///
    /// Schedules: deduplicated by signature, sorted by (day, start), ranked by
    /// ascending score (ties keep first-seen order). Units: sorted by name,
    /// options by code, events by (day, start).
    pub fn build(&self, rows: &[Row]) -> Catalog {
        let mut schedules: Vec<(String, Vec<Event>)> = Vec::new();
        let mut schedule_index: HashMap<&str, usize> = HashMap::new();
        let mut units: Vec<(String, UnitAccumulator)> = Vec::new();
        let mut unit_index: HashMap<&str, usize> = HashMap::new();

        for row in rows {
            let event = Event::from_row(row);

            let s = *schedule_index.entry(row.schedule_key.as_str()).or_insert_with(|| {
                schedules.push((row.schedule_key.clone(), Vec::new()));
                schedules.len() - 1
            });
            schedules[s].1.push(event.clone());

            let u = *unit_index.entry(row.unit.as_str()).or_insert_with(|| {
                units.push((row.unit.clone(), UnitAccumulator::default()));
                units.len() - 1
            });
            let unit = &mut units[u].1;

            if row.mandatory {
                unit.mandatory.insert(event);
            } else {
                unit.option_mut(&row.option_code).insert(event);
            }
        }

        let mut schedules: Vec<Schedule> = schedules
            .into_iter()
            .map(|(key, events)| Schedule::from_events(key, events))
            .collect();
        schedules.sort_by_key(|s| s.metrics.score);

        let mut units: Vec<Unit> = units
            .into_iter()
            .map(|(name, accumulator)| accumulator.finish(name))
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name));

        log::debug!(
            "catalog built from {} rows: {} schedules, {} units",
            rows.len(),
            schedules.len(),
            units.len()
        );

        Catalog { schedules, units }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AutoScheduler;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::new("Algebra", "TP", "T1")
                .with_schedule("A")
                .on_day("Segunda", 1)
                .between("09:00", "10:00"),
            Row::new("Fisica", "T", "OBR")
                .with_schedule("A")
                .on_day("Segunda", 1)
                .between("12:00", "13:00")
                .mandatory(),
            Row::new("Algebra", "TP", "T2")
                .with_schedule("B")
                .on_day("Terca", 2)
                .between("08:00", "10:00"),
        ]
    }

    #[test]
    fn test_metrics_and_unit_options() {
        let catalog = CatalogBuilder::new().build(&sample_rows());

        assert_eq!(catalog.schedules.len(), 2);
        assert_eq!(catalog.schedules[0].key, "B");
        assert_eq!(catalog.schedules[0].metrics.days_count, 1);
        assert_eq!(catalog.schedules[0].metrics.score, 220);
        assert_eq!(catalog.schedules[1].key, "A");
        assert_eq!(catalog.schedules[1].metrics.days_count, 1);
        assert_eq!(catalog.schedules[1].metrics.gaps, 120);
        assert_eq!(catalog.schedules[1].metrics.score, 580);

        assert_eq!(catalog.units.len(), 2);
        let algebra = catalog.unit("Algebra").unwrap();
        let fisica = catalog.unit("Fisica").unwrap();
        assert_eq!(algebra.option_codes(), vec!["T1", "T2"]);
        assert!(algebra.mandatory_events.is_empty());
        assert_eq!(fisica.mandatory_events.len(), 1);
        assert!(fisica.options.is_empty());
    }

    #[test]
    fn test_units_and_options_sorted() {
        let rows = vec![
            Row::new("SI", "PL", "PL3").with_schedule("X").on_day("", 1).between("08:00", "09:00"),
            Row::new("API", "PL", "PL2").with_schedule("X").on_day("", 1).between("09:00", "10:00"),
            Row::new("API", "PL", "PL1").with_schedule("Y").on_day("", 1).between("09:00", "10:00"),
        ];

        let catalog = CatalogBuilder::new().build(&rows);
        let names: Vec<_> = catalog.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["API", "SI"]);
        assert_eq!(catalog.units[0].option_codes(), vec!["PL1", "PL2"]);
    }

    #[test]
    fn test_duplicate_event_collapses_everywhere() {
        let option = Row::new("API", "T", "T1").with_schedule("A").on_day("SEG", 1).between("08:00", "10:00");
        let fixed = Row::new("FIS", "OBR", "OBR")
            .with_schedule("A")
            .on_day("SEG", 1)
            .between("10:00", "12:00")
            .mandatory();
        let rows = vec![option.clone(), option, fixed.clone(), fixed];

        let catalog = CatalogBuilder::new().build(&rows);
        assert_eq!(catalog.schedules[0].event_count(), 2);
        assert_eq!(catalog.unit("API").unwrap().options[0].events.len(), 1);
        assert_eq!(catalog.unit("FIS").unwrap().mandatory_events.len(), 1);
    }

    #[test]
    fn test_unit_options_aggregate_across_schedules() {
        let rows = vec![
            Row::new("API", "T", "T1").with_schedule("A").on_day("", 3).between("10:00", "12:00"),
            Row::new("API", "T", "T1").with_schedule("B").on_day("", 1).between("08:00", "10:00"),
            Row::new("API", "T", "T1").with_schedule("C").on_day("", 3).between("10:00", "12:00"),
        ];

        let catalog = CatalogBuilder::new().build(&rows);
        let events = &catalog.unit("API").unwrap().option("T1").unwrap().events;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].day_index, 1);
        assert_eq!(events[1].day_index, 3);
    }

    #[test]
    fn test_score_ties_keep_first_seen_order() {
        let rows = vec![
            Row::new("API", "T", "T1").with_schedule("first").on_day("", 1).between("08:00", "10:00"),
            Row::new("API", "T", "T2").with_schedule("second").on_day("", 2).between("08:00", "10:00"),
        ];

        let catalog = CatalogBuilder::new().build(&rows);
        let keys: Vec<_> = catalog.schedules.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["first", "second"]);
    }

    #[test]
    fn test_oversized_hours_build_without_overflow() {
        let rows = vec![
            Row::new("API", "T", "T1")
                .with_schedule("A")
                .on_day("SEG", 1)
                .between("99999999:00", "10:00"),
            Row::new("API", "T", "T2")
                .with_schedule("A")
                .on_day("SEG", 1)
                .between("08:00", "40000000:00"),
        ];

        let catalog = CatalogBuilder::new().build(&rows);
        let schedule = catalog.schedule("A").unwrap();
        assert_eq!(schedule.event_count(), 2);
        assert_eq!(schedule.events[0].start_minutes, 480);
        assert_eq!(schedule.events[1].start_minutes, i32::MAX);
        assert_eq!(schedule.metrics.span, i64::from(i32::MAX) - 480);
    }

    #[test]
    fn test_empty_rows() {
        let catalog = CatalogBuilder::new().build(&[]);
        assert!(catalog.is_empty());
        assert!(catalog.best().is_none());
    }

    #[test]
    fn test_catalog_of_generated_rows() {
        let rows = vec![
            Row::new("API", "T", "T1").on_day("SEG", 1).between("08:00", "10:00"),
            Row::new("ALNET", "PL", "PL1").on_day("TER", 2).between("09:30", "12:30"),
            Row::new("ALNET", "PL", "PL4").on_day("SEG", 1).between("10:00", "13:00"),
        ];

        let generated = AutoScheduler::new().generate(&rows);
        let catalog = CatalogBuilder::new().build(&generated);

        // PL4 shares Monday with API T1 → one day, ranks first
        assert_eq!(catalog.schedules.len(), 2);
        assert_eq!(catalog.best().unwrap().key, "Auto 002");
        assert_eq!(catalog.best().unwrap().metrics.days_count, 1);
        assert!(catalog.schedules.iter().all(|s| !s.has_conflicts()));
    }

    #[test]
    fn test_catalog_wire_shape() {
        let catalog = CatalogBuilder::new().build(&sample_rows());
        let json = serde_json::to_value(&catalog).unwrap();
        let fisica = &json["units"][1];
        assert_eq!(fisica["name"], "Fisica");
        assert_eq!(fisica["mandatoryEvents"][0]["startMinutes"], 720);
        assert_eq!(json["schedules"][0]["events"][0]["optionCode"], "T2");
    }
}
