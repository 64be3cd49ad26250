//! Session → row conversion.

use super::parser::{parse_selection_text, Session};
use crate::error::{Result, TimetableError};
use crate::models::Row;

/// Schedule key given to rows typed in by hand.
pub const TEXT_SCHEDULE_KEY: &str = "Selecao Manual (texto)";

/// Day index of a normalized 3-letter day, 0 when unknown.
pub fn day_index(day: &str) -> u8 {
    match day {
        "SEG" => 1,
        "TER" => 2,
        "QUA" => 3,
        "QUI" => 4,
        "SEX" => 5,
        "SAB" => 6,
        "DOM" => 7,
        _ => 0,
    }
}

/// Converts parsed sessions to rows under [`TEXT_SCHEDULE_KEY`].
///
/// The option code falls back to the class type; `OBR` sessions are
/// mandatory.
pub fn rows_from_sessions(sessions: &[Session]) -> Vec<Row> {
    sessions
        .iter()
        .map(|session| Row {
            schedule_key: TEXT_SCHEDULE_KEY.to_string(),
            unit: session.unit.clone(),
            option_code: session
                .option_code
                .clone()
                .unwrap_or_else(|| session.class_type.clone()),
            class_type: session.class_type.clone(),
            day: session.day.clone(),
            day_index: day_index(&session.day),
            start: session.start.clone(),
            end: session.end.clone(),
            mandatory: session.class_type == "OBR",
        })
        .collect()
}

/// Parses text and converts its session lines to rows.
///
/// # Errors
/// [`TimetableError::NoSessions`] when the text has no session line; bare
/// selections without day and time are not enough to build a timetable.
pub fn rows_from_text(text: &str) -> Result<Vec<Row>> {
    let parsed = parse_selection_text(text);
    if parsed.sessions.is_empty() {
        return Err(TimetableError::NoSessions);
    }
    Ok(rows_from_sessions(&parsed.sessions))
}
