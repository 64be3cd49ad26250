//! Timetable domain models.
//!
//! Provides the shared row contract and the derived catalog types.
//!
//! # Projections
//!
//! | Type | Aggregates |
//! |------|-----------|
//! | Row | One session occurrence (input/output contract) |
//! | Event | A row with minute offsets |
//! | Schedule | All events of one combination, with metrics |
//! | Unit | All mandatory events and options of one course |

mod event;
mod row;
mod schedule;
mod unit;

pub use event::{dedup_by_signature, has_overlap, sort_chronologically, Event, EventSignature};
pub use row::{from_minutes, is_clock_time, to_minutes, Row};
pub use schedule::{Schedule, ScheduleMetrics};
pub use unit::{Catalog, Unit, UnitOption};
