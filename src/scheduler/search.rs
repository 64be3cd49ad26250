//! Fair bounded schedule search.
//!
//! Enumerates up to `max_schedules` non-overlapping combinations that pick
//! exactly one option per choice group, on top of every mandatory row.
//!
//! # Algorithm
//!
//! 1. Group rows (see [`group_rows`]).
//! 2. No groups: the mandatory rows alone are the only combination.
//! 3. Otherwise fan out on the first group's `k` options. Each option seeds
//!    an independent depth-first search over the remaining groups, capped at
//!    `ceil(max_schedules / k)` results.
//! 4. Merge the branch results round-robin in branch order (1st of every
//!    branch, then 2nd, …) until `max_schedules` results are taken.
//! 5. Relabel the merged combinations "Auto 001", "Auto 002", … by position.
//! 6. If nothing survives and the input was not empty, return the input
//!    unchanged as the single schedule "Manual 1".
//!
//! The per-branch quota plus round-robin merge keeps a truncated result from
//! collapsing onto the first option of the first group.
//!
//! # Complexity
//! Each visited node checks pairwise overlap of mandatory + chosen events:
//! O(n²) in the candidate size, which is bounded by the group count.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use super::grouping::{group_rows, ChoiceGroup, OptionBucket, RowGroups};
use crate::models::{has_overlap, Event, Row};

/// Default cap on generated schedules.
pub const DEFAULT_MAX_SCHEDULES: usize = 300;
/// Prefix of generated schedule keys.
pub const AUTO_KEY_PREFIX: &str = "Auto";
/// Key of the fallback schedule returned when no combination is valid.
pub const MANUAL_FALLBACK_KEY: &str = "Manual 1";

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of schedules to generate. Values below 1 act as 1.
    pub max_schedules: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_schedules: DEFAULT_MAX_SCHEDULES,
        }
    }
}

impl SearchConfig {
    /// Sets the schedule cap.
    pub fn with_max_schedules(mut self, max_schedules: usize) -> Self {
        self.max_schedules = max_schedules;
        self
    }

    /// Effective cap (at least 1).
    #[inline]
    pub fn effective_cap(&self) -> usize {
        self.max_schedules.max(1)
    }
}

/// Automatic schedule generator.
///
/// # Example
///
/// ```
/// use u_timetable::models::Row;
/// use u_timetable::scheduler::AutoScheduler;
///
/// let rows = vec![
///     Row::new("API", "T", "T1").on_day("SEG", 1).between("08:00", "10:00"),
///     Row::new("ALNET", "PL", "PL1").on_day("TER", 2).between("09:30", "12:30"),
///     Row::new("ALNET", "PL", "PL4").on_day("QUI", 4).between("09:30", "12:30"),
/// ];
///
/// let generated = AutoScheduler::new().generate(&rows);
/// assert_eq!(generated.len(), 4);
/// assert_eq!(generated[0].schedule_key, "Auto 001");
/// assert_eq!(generated[3].schedule_key, "Auto 002");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoScheduler {
    config: SearchConfig,
}

impl AutoScheduler {
    /// Creates a generator with the default cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator from a configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Sets the schedule cap.
    pub fn with_max_schedules(mut self, max_schedules: usize) -> Self {
        self.config.max_schedules = max_schedules;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Generates labeled rows for up to `max_schedules` combinations.
    ///
    /// Output rows are grouped by schedule, schedules in key order. Empty
    /// input yields empty output. When no combination is valid the input is
    /// returned relabeled as [`MANUAL_FALLBACK_KEY`].
    pub fn generate(&self, rows: &[Row]) -> Vec<Row> {
        let combinations = self.combinations(rows);

        if combinations.is_empty() {
            if rows.is_empty() {
                return Vec::new();
            }
            log::info!(
                "no conflict-free combination among {} rows, falling back to {MANUAL_FALLBACK_KEY:?}",
                rows.len()
            );
            return rows.iter().map(|r| r.relabeled(MANUAL_FALLBACK_KEY)).collect();
        }

        combinations
            .iter()
            .enumerate()
            .flat_map(|(index, combination)| {
                let key = auto_key(index + 1);
                combination.iter().map(move |r| r.relabeled(&key))
            })
            .collect()
    }

    /// Valid combinations in merged order, rows not yet relabeled.
    ///
    /// Each combination is the mandatory rows followed by the chosen option
    /// rows in group order.
    pub fn combinations(&self, rows: &[Row]) -> Vec<Vec<Row>> {
        let grouped = group_rows(rows);
        self.search(&grouped)
    }

    /// Runs the balanced search over already grouped rows.
    pub fn search(&self, grouped: &RowGroups) -> Vec<Vec<Row>> {
        let cap = self.config.effective_cap();

        let Some((primary, rest)) = grouped.groups.split_first() else {
            return vec![grouped.mandatory.clone()];
        };

        let mandatory_events: Vec<Event> = grouped.mandatory.iter().map(Event::from_row).collect();
        let quota = cap.div_ceil(primary.option_count()).max(1);

        let branches: Vec<Vec<Vec<Row>>> = primary
            .options
            .iter()
            .map(|seed| {
                let branch = BranchSearch {
                    groups: rest,
                    mandatory_rows: &grouped.mandatory,
                    mandatory_events: &mandatory_events,
                    quota,
                }
                .run(seed);
                log::debug!(
                    "branch {}={} produced {} of {} combinations",
                    primary.key(),
                    seed.code,
                    branch.len(),
                    quota
                );
                branch
            })
            .filter(|branch| !branch.is_empty())
            .collect();

        let merged = round_robin(branches, cap);
        log::debug!("merged {} combinations (cap {cap})", merged.len());
        merged
    }
}

/// Schedule key for a 1-based position: "Auto 001".
pub fn auto_key(position: usize) -> String {
    format!("{AUTO_KEY_PREFIX} {position:03}")
}

/// Depth-first search of one first-group branch.
struct BranchSearch<'a> {
    groups: &'a [ChoiceGroup],
    mandatory_rows: &'a [Row],
    mandatory_events: &'a [Event],
    quota: usize,
}

impl<'a> BranchSearch<'a> {
    /// Collects up to `quota` valid combinations seeded with one option.
    fn run(&self, seed: &'a OptionBucket) -> Vec<Vec<Row>> {
        let mut found = Vec::new();
        let mut chosen = vec![seed];

        let _ = self.descend(0, &mut chosen, &mut |combination: Vec<Row>| {
            found.push(combination);
            if found.len() >= self.quota {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        found
    }

    /// Tries every option of `groups[index]`, pruning on overlap.
    ///
    /// `visit` receives each complete valid combination and breaks the walk
    /// once the quota is met.
    fn descend(
        &self,
        index: usize,
        chosen: &mut Vec<&'a OptionBucket>,
        visit: &mut dyn FnMut(Vec<Row>) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if index >= self.groups.len() {
            if self.conflicts(chosen) {
                return ControlFlow::Continue(());
            }
            return visit(self.materialize(chosen));
        }

        let groups = self.groups;
        for option in &groups[index].options {
            chosen.push(option);
            let flow = if self.conflicts(chosen) {
                ControlFlow::Continue(())
            } else {
                self.descend(index + 1, chosen, visit)
            };
            chosen.pop();
            flow?;
        }

        ControlFlow::Continue(())
    }

    fn conflicts(&self, chosen: &[&OptionBucket]) -> bool {
        let candidate: Vec<&Event> = self
            .mandatory_events
            .iter()
            .chain(chosen.iter().flat_map(|o| o.events.iter()))
            .collect();
        has_overlap(&candidate)
    }

    fn materialize(&self, chosen: &[&OptionBucket]) -> Vec<Row> {
        self.mandatory_rows
            .iter()
            .chain(chosen.iter().flat_map(|o| o.rows.iter()))
            .cloned()
            .collect()
    }
}

/// Interleaves branch results: position 0 of every branch, then position 1,
/// skipping exhausted branches, until `cap` items are taken.
fn round_robin<T>(branches: Vec<Vec<T>>, cap: usize) -> Vec<T> {
    let mut iters: Vec<_> = branches.into_iter().map(Vec::into_iter).collect();
    let mut merged = Vec::new();

    while merged.len() < cap {
        let mut added = false;
        for iter in iters.iter_mut() {
            if let Some(item) = iter.next() {
                merged.push(item);
                added = true;
                if merged.len() >= cap {
                    break;
                }
            }
        }
        if !added {
            break;
        }
    }

    merged
}
