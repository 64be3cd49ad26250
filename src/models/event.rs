//! Event model and event signatures.
//!
//! An event is a [`Row`] enriched with integer minute offsets so interval
//! arithmetic does not re-parse "HH:MM" strings.
//!
//! # Identity
//! Two events with the same [`EventSignature`] are the same event, whatever
//! schedule they came from. Signatures key every deduplication.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::row::Row;

/// A timed class session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Course / curricular unit name.
    pub unit: String,
    /// Option (turn) code.
    pub option_code: String,
    /// Component type.
    pub class_type: String,
    /// Display day name.
    pub day: String,
    /// Day of week (1-7), 0 when unknown.
    pub day_index: u8,
    /// Start time, "HH:MM".
    pub start: String,
    /// End time, "HH:MM".
    pub end: String,
    /// Fixed session.
    pub mandatory: bool,
    /// Start offset (minutes since midnight, inclusive).
    pub start_minutes: i32,
    /// End offset (minutes since midnight, exclusive).
    pub end_minutes: i32,
}

/// Composite identity of an event.
///
/// A value-type tuple rather than a joined string, so field values
/// containing a delimiter cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventSignature {
    pub unit: String,
    pub option_code: String,
    pub class_type: String,
    pub day_index: u8,
    pub start: String,
    pub end: String,
}

impl EventSignature {
    /// Signature of a row, fields taken verbatim.
    pub fn of(row: &Row) -> Self {
        Self {
            unit: row.unit.clone(),
            option_code: row.option_code.clone(),
            class_type: row.class_type.clone(),
            day_index: row.day_index,
            start: row.start.clone(),
            end: row.end.clone(),
        }
    }

    /// Signature of a row with unit, option and class type uppercased.
    ///
    /// Used when grouping choices, where `api`/`API` name the same course.
    pub fn normalized(row: &Row) -> Self {
        Self {
            unit: row.unit.to_uppercase(),
            option_code: row.option_code.to_uppercase(),
            class_type: row.class_type.to_uppercase(),
            day_index: row.day_index,
            start: row.start.clone(),
            end: row.end.clone(),
        }
    }
}

impl Event {
    /// Builds an event from a row.
    pub fn from_row(row: &Row) -> Self {
        Self {
            unit: row.unit.clone(),
            option_code: row.option_code.clone(),
            class_type: row.class_type.clone(),
            day: row.day.clone(),
            day_index: row.day_index,
            start: row.start.clone(),
            end: row.end.clone(),
            mandatory: row.mandatory,
            start_minutes: row.start_minutes(),
            end_minutes: row.end_minutes(),
        }
    }

    /// This event's signature.
    pub fn signature(&self) -> EventSignature {
        EventSignature {
            unit: self.unit.clone(),
            option_code: self.option_code.clone(),
            class_type: self.class_type.clone(),
            day_index: self.day_index,
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }

    /// Duration in minutes, never negative.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (i64::from(self.end_minutes) - i64::from(self.start_minutes)).max(0)
    }

    /// Whether two events collide: same day and intersecting `[start, end)`.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day_index == other.day_index
            && self.start_minutes < other.end_minutes
            && other.start_minutes < self.end_minutes
    }

    /// Display/metrics ordering key.
    #[inline]
    pub fn sort_key(&self) -> (u8, i32) {
        (self.day_index, self.start_minutes)
    }
}

/// Whether any two events in the slice overlap. O(n²).
pub fn has_overlap<E: Borrow<Event>>(events: &[E]) -> bool {
    events.iter().enumerate().any(|(i, left)| {
        events[i + 1..]
            .iter()
            .any(|right| left.borrow().overlaps(right.borrow()))
    })
}

/// Collapses events sharing a signature; the last one wins and keeps the
/// first one's position.
pub fn dedup_by_signature(events: Vec<Event>) -> Vec<Event> {
    let mut positions = HashMap::with_capacity(events.len());
    let mut deduplicated: Vec<Event> = Vec::with_capacity(events.len());

    for event in events {
        match positions.entry(event.signature()) {
            Entry::Occupied(slot) => {
                deduplicated[*slot.get()] = event;
            }
            Entry::Vacant(slot) => {
                slot.insert(deduplicated.len());
                deduplicated.push(event);
            }
        }
    }

    deduplicated
}

/// Stable sort by (day index, start minutes).
pub fn sort_chronologically(events: &mut [Event]) {
    events.sort_by_key(Event::sort_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(day_index: u8, start: &str, end: &str) -> Event {
        Event::from_row(&Row::new("API", "T", "T1").on_day("", day_index).between(start, end))
    }

    #[test]
    fn test_overlap_same_day() {
        assert!(event(1, "08:00", "10:00").overlaps(&event(1, "09:00", "11:00")));
        assert!(event(1, "09:00", "11:00").overlaps(&event(1, "08:00", "10:00")));
        assert!(event(1, "08:00", "12:00").overlaps(&event(1, "09:00", "10:00")));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        assert!(!event(5, "08:00", "10:00").overlaps(&event(5, "10:00", "12:00")));
    }

    #[test]
    fn test_different_days_do_not_overlap() {
        assert!(!event(1, "08:00", "10:00").overlaps(&event(2, "08:00", "10:00")));
    }

    #[test]
    fn test_zero_duration_never_overlaps() {
        assert!(!event(1, "10:00", "10:00").overlaps(&event(1, "08:00", "10:00")));
        assert_eq!(event(1, "10:00", "09:00").duration_minutes(), 0);
    }

    #[test]
    fn test_duration_of_extreme_offsets() {
        let wide = event(1, "-99999999:00", "99999999:00");
        assert_eq!(wide.duration_minutes(), i64::from(i32::MAX) - i64::from(i32::MIN));
    }

    #[test]
    fn test_has_overlap() {
        assert!(!has_overlap::<Event>(&[]));
        assert!(!has_overlap(&[event(1, "08:00", "09:00"), event(1, "09:00", "10:00")]));
        assert!(has_overlap(&[
            event(1, "08:00", "09:00"),
            event(2, "08:00", "09:00"),
            event(1, "08:30", "08:45"),
        ]));
    }

    #[test]
    fn test_signature_ignores_schedule_and_day_name() {
        let a = Row::new("API", "T", "T1").with_schedule("A").on_day("Seg", 1).between("08:00", "10:00");
        let b = Row::new("API", "T", "T1").with_schedule("B").on_day("SEG", 1).between("08:00", "10:00");
        assert_eq!(EventSignature::of(&a), EventSignature::of(&b));
        assert_eq!(Event::from_row(&a).signature(), EventSignature::of(&a));
    }

    #[test]
    fn test_signature_is_not_delimiter_ambiguous() {
        let a = Row::new("A|B", "T", "C");
        let b = Row::new("A", "T", "B|C");
        assert_ne!(EventSignature::of(&a), EventSignature::of(&b));
    }

    #[test]
    fn test_normalized_signature_uppercases() {
        let lower = Row::new("api", "t", "t1");
        let upper = Row::new("API", "T", "T1");
        assert_ne!(EventSignature::of(&lower), EventSignature::of(&upper));
        assert_eq!(EventSignature::normalized(&lower), EventSignature::normalized(&upper));
    }

    #[test]
    fn test_dedup_keeps_first_position() {
        let mut late = event(2, "08:00", "10:00");
        late.day = "Terca".into();
        let deduplicated = dedup_by_signature(vec![
            event(2, "08:00", "10:00"),
            event(1, "08:00", "10:00"),
            late,
        ]);
        assert_eq!(deduplicated.len(), 2);
        assert_eq!(deduplicated[0].day, "Terca");
        assert_eq!(deduplicated[1].day_index, 1);
    }

    #[test]
    fn test_sort_chronologically() {
        let mut events = vec![
            event(2, "08:00", "09:00"),
            event(1, "11:00", "12:00"),
            event(1, "08:00", "09:00"),
        ];
        sort_chronologically(&mut events);
        let keys: Vec<_> = events.iter().map(Event::sort_key).collect();
        assert_eq!(keys, vec![(1, 480), (1, 660), (2, 480)]);
    }
}
