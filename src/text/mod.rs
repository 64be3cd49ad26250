//! Free-text turn selection.
//!
//! Parses pasted timetable text into selections and timed sessions, and
//! turns sessions into rows for the scheduler.

mod parser;
mod rows;

pub use parser::{normalize_day, normalize_time, parse_selection_text, ParsedSelection, Session};
pub use rows::{day_index, rows_from_sessions, rows_from_text, TEXT_SCHEDULE_KEY};
