//! Unit (course) catalog model.
//!
//! A unit aggregates, across every schedule, one course's mandatory events
//! and all of its known options. Units and schedules are independent
//! projections of the same event set.

use serde::{Deserialize, Serialize};

use super::event::Event;
use super::schedule::Schedule;

/// One course with its fixed sessions and alternative options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit name.
    pub name: String,
    /// Mandatory events, deduplicated and sorted chronologically.
    pub mandatory_events: Vec<Event>,
    /// Options sorted by code.
    pub options: Vec<UnitOption>,
}

/// One selectable option (turn) of a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOption {
    /// Option code, e.g. `PL2`.
    pub code: String,
    /// Events, deduplicated and sorted chronologically.
    pub events: Vec<Event>,
}

/// Output of the catalog builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Schedules sorted by ascending score.
    pub schedules: Vec<Schedule>,
    /// Units sorted by name.
    pub units: Vec<Unit>,
}

impl Unit {
    /// Finds an option by code.
    pub fn option(&self, code: &str) -> Option<&UnitOption> {
        self.options.iter().find(|o| o.code == code)
    }

    /// Option codes in catalog order.
    pub fn option_codes(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.code.as_str()).collect()
    }
}

impl Catalog {
    /// Finds a unit by name.
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Finds a schedule by key.
    pub fn schedule(&self, key: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.key == key)
    }

    /// Best-ranked schedule.
    pub fn best(&self) -> Option<&Schedule> {
        self.schedules.first()
    }

    /// Whether the catalog has neither schedules nor units.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty() && self.units.is_empty()
    }
}
