//! Row (shared contract) model.
//!
//! A row is one flat class-session occurrence. Every producer (free-text
//! parser, spreadsheet reader, schedule search) emits rows and every
//! consumer (search, catalog builder, export) reads them.
//!
//! # Time Model
//! `start`/`end` are "HH:MM" wall-clock strings within the day given by
//! `day_index` (1 = Monday … 7 = Sunday, 0 = unknown). Together they define
//! the half-open interval `[start, end)`.

use serde::{Deserialize, Serialize};

/// A normalized class-session row.
///
/// Immutable once produced; relabeling (see [`Row::relabeled`]) returns a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Schedule (combination) this row belongs to.
    pub schedule_key: String,
    /// Course / curricular unit name.
    pub unit: String,
    /// Option (turn) code within the unit, e.g. `PL2`.
    pub option_code: String,
    /// Component type, e.g. `T`, `TP`, `PL`, `OBR`.
    pub class_type: String,
    /// Display day name.
    pub day: String,
    /// Day of week (1-7), 0 when unknown.
    pub day_index: u8,
    /// Start time, "HH:MM".
    pub start: String,
    /// End time, "HH:MM".
    pub end: String,
    /// Fixed session that every schedule must contain.
    pub mandatory: bool,
}

impl Row {
    /// Creates a non-mandatory row with empty schedule key and day name.
    pub fn new(
        unit: impl Into<String>,
        class_type: impl Into<String>,
        option_code: impl Into<String>,
    ) -> Self {
        Self {
            schedule_key: String::new(),
            unit: unit.into(),
            option_code: option_code.into(),
            class_type: class_type.into(),
            day: String::new(),
            day_index: 0,
            start: String::from("00:00"),
            end: String::from("00:00"),
            mandatory: false,
        }
    }

    /// Sets the schedule key.
    pub fn with_schedule(mut self, schedule_key: impl Into<String>) -> Self {
        self.schedule_key = schedule_key.into();
        self
    }

    /// Sets the day name and index.
    pub fn on_day(mut self, day: impl Into<String>, day_index: u8) -> Self {
        self.day = day.into();
        self.day_index = day_index;
        self
    }

    /// Sets the `[start, end)` times.
    pub fn between(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    /// Marks the row as mandatory.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Returns a copy of this row under another schedule key.
    pub fn relabeled(&self, schedule_key: &str) -> Self {
        Self {
            schedule_key: schedule_key.to_string(),
            ..self.clone()
        }
    }

    /// Start offset in minutes since midnight.
    #[inline]
    pub fn start_minutes(&self) -> i32 {
        to_minutes(&self.start)
    }

    /// End offset in minutes since midnight.
    #[inline]
    pub fn end_minutes(&self) -> i32 {
        to_minutes(&self.end)
    }
}

/// Converts "HH:MM" to minutes since midnight.
///
/// Lenient: each side is read as its leading digits, so a missing or
/// malformed part counts as 0 (`"9"` → 540, `""` → 0). Out-of-range values
/// saturate at the `i32` bounds.
pub fn to_minutes(time: &str) -> i32 {
    let mut parts = time.splitn(2, ':');
    let hour = i64::from(leading_int(parts.next().unwrap_or("")));
    let minute = i64::from(leading_int(parts.next().unwrap_or("")));
    let total = hour.saturating_mul(60).saturating_add(minute);
    total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Formats minutes since midnight as zero-padded "HH:MM".
pub fn from_minutes(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Strict "H:MM" / "HH:MM" check (hour 0-23, minute 0-59).
pub fn is_clock_time(time: &str) -> bool {
    let Some((hour, minute)) = time.split_once(':') else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
        return false;
    }
    matches!((hour.parse::<u32>(), minute.parse::<u32>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

fn leading_int(part: &str) -> i32 {
    let trimmed = part.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let value = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i32, |acc, b| acc.saturating_mul(10).saturating_add(i32::from(b - b'0')));
    if negative {
        -value
    } else {
        value
    }
}
