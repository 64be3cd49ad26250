//! Schedule synthesis and catalog building.
//!
//! Provides the fair bounded combination search and the ranking pass that
//! turns labeled rows into scored schedules and unit catalogs.
//!
//! # Pipeline
//!
//! ```text
//! rows ─▶ group_rows ─▶ AutoScheduler (branch search + round-robin merge)
//!                              │ labeled rows
//!                              ▼
//!                        CatalogBuilder ─▶ Catalog { schedules, units }
//! ```
//!
//! `CatalogBuilder` also runs standalone on externally labeled rows, e.g. a
//! spreadsheet that already lists full schedules.
//!
//! # Metrics
//!
//! `ScheduleMetrics` ranks schedules by used days, idle gaps, daily span and
//! load balance.

mod catalog;
mod grouping;
mod metrics;
mod search;

pub use catalog::CatalogBuilder;
pub use grouping::{group_rows, ChoiceGroup, OptionBucket, RowGroups};
pub use metrics::{BALANCE_WEIGHT, DAY_WEIGHT, GAP_WEIGHT};
pub use search::{
    auto_key, AutoScheduler, SearchConfig, AUTO_KEY_PREFIX, DEFAULT_MAX_SCHEDULES,
    MANUAL_FALLBACK_KEY,
};
