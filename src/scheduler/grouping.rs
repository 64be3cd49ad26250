//! Row grouping.
//!
//! Partitions rows into mandatory rows and choice groups. A choice group is
//! every option of one (unit, class type) pair; the search picks exactly one
//! option per group.
//!
//! # Keys
//! Group keys and option codes are compared uppercased and trimmed, so
//! `api / pl2` and `API / PL2` land in the same bucket. Rows themselves are
//! kept verbatim.
//!
//! # Ordering
//! Groups keep the first-seen order of their keys and options keep the
//! first-seen order of their codes. The search's fairness depends on this
//! explicit order, never on map iteration order.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{Event, EventSignature, Row};

/// One selectable option of a choice group.
#[derive(Debug, Clone)]
pub struct OptionBucket {
    /// Normalized option code.
    pub code: String,
    /// Rows of this option, deduplicated by signature.
    pub rows: Vec<Row>,
    /// Events of `rows`, index-aligned.
    pub events: Vec<Event>,
    positions: HashMap<EventSignature, usize>,
}

/// All options of one (unit, class type) pair.
#[derive(Debug, Clone)]
pub struct ChoiceGroup {
    /// Normalized unit name.
    pub unit: String,
    /// Normalized class type.
    pub class_type: String,
    /// Options in first-seen order.
    pub options: Vec<OptionBucket>,
}

/// Result of [`group_rows`].
#[derive(Debug, Clone, Default)]
pub struct RowGroups {
    /// Mandatory rows, verbatim and in input order (not deduplicated).
    pub mandatory: Vec<Row>,
    /// Choice groups in first-seen order; none of them is empty.
    pub groups: Vec<ChoiceGroup>,
    /// Non-mandatory rows dropped for a missing unit, class type or option.
    pub dropped: usize,
}

impl OptionBucket {
    fn new(code: String) -> Self {
        Self {
            code,
            rows: Vec::new(),
            events: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Adds a row; a row with an already-seen signature replaces the
    /// earlier one in place.
    fn insert(&mut self, row: &Row) {
        let event = Event::from_row(row);
        match self.positions.entry(EventSignature::normalized(row)) {
            Entry::Occupied(slot) => {
                let index = *slot.get();
                self.rows[index] = row.clone();
                self.events[index] = event;
            }
            Entry::Vacant(slot) => {
                slot.insert(self.rows.len());
                self.rows.push(row.clone());
                self.events.push(event);
            }
        }
    }
}

impl ChoiceGroup {
    /// Number of options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Group key, `UNIT::CLASSTYPE`.
    pub fn key(&self) -> String {
        format!("{}::{}", self.unit, self.class_type)
    }
}

impl RowGroups {
    /// Upper bound on the number of combinations (product of option counts).
    pub fn combination_bound(&self) -> usize {
        self.groups
            .iter()
            .fold(1usize, |acc, g| acc.saturating_mul(g.option_count()))
    }
}

/// Splits rows into mandatory rows and choice groups.
pub fn group_rows(rows: &[Row]) -> RowGroups {
    let mut result = RowGroups::default();
    let mut group_index: HashMap<(String, String), usize> = HashMap::new();
    let mut option_index: Vec<HashMap<String, usize>> = Vec::new();

    for row in rows {
        if row.mandatory {
            result.mandatory.push(row.clone());
            continue;
        }

        let unit = normalize_key(&row.unit);
        let class_type = normalize_key(&row.class_type);
        let option_code = normalize_key(&row.option_code);

        if unit.is_empty() || class_type.is_empty() || option_code.is_empty() {
            result.dropped += 1;
            continue;
        }

        let g = *group_index
            .entry((unit.clone(), class_type.clone()))
            .or_insert_with(|| {
                result.groups.push(ChoiceGroup {
                    unit,
                    class_type,
                    options: Vec::new(),
                });
                option_index.push(HashMap::new());
                result.groups.len() - 1
            });

        let group = &mut result.groups[g];
        let o = *option_index[g]
            .entry(option_code.clone())
            .or_insert_with(|| {
                group.options.push(OptionBucket::new(option_code));
                group.options.len() - 1
            });

        group.options[o].insert(row);
    }

    result.groups.retain(|g| !g.options.is_empty());

    log::debug!(
        "grouped {} rows: {} mandatory, {} choice groups, {} dropped",
        rows.len(),
        result.mandatory.len(),
        result.groups.len(),
        result.dropped
    );

    result
}

fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}
