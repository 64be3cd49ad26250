//! Input validation for timetable rows.
//!
//! Checks row integrity before scheduling. Detects:
//! - Option rows missing a unit, class type or option code
//! - Times that are not "HH:MM"
//! - Day indices outside 1-7
//! - Zero or negative durations
//! - Mandatory rows that collide with each other
//!
//! Validation is advisory. The scheduler tolerates every problem listed
//! here (incomplete rows are dropped, bad times read as 0, colliding
//! mandatory rows force the manual fallback); callers use the report to
//! explain a surprising result.

use crate::models::{is_clock_time, Event, Row};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Index of the offending row in the input.
    pub row: usize,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An option row lacks unit, class type or option code.
    MissingField,
    /// Start or end is not a valid "HH:MM" time.
    InvalidTime,
    /// Day index is 0 or greater than 7.
    UnknownDay,
    /// End is not after start.
    NonPositiveDuration,
    /// Two mandatory rows overlap, so no schedule can be conflict-free.
    MandatoryOverlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, row: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            row,
            message: message.into(),
        }
    }
}

/// Validates a row set.
///
/// Checks:
/// 1. Option rows carry unit, class type and option code
/// 2. Start and end are "HH:MM"
/// 3. Day index is within 1-7
/// 4. End is after start
/// 5. No two mandatory rows overlap
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_rows(rows: &[Row]) -> ValidationResult {
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if !row.mandatory {
            let missing: Vec<&str> = [
                ("unit", &row.unit),
                ("class type", &row.class_type),
                ("option code", &row.option_code),
            ]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

            if !missing.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    index,
                    format!("Row {index} is missing {}", missing.join(", ")),
                ));
            }
        }

        let mut times_valid = true;
        for (name, value) in [("start", &row.start), ("end", &row.end)] {
            if !is_clock_time(value) {
                times_valid = false;
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTime,
                    index,
                    format!("Row {index} has invalid {name} time '{value}'"),
                ));
            }
        }

        if !(1..=7).contains(&row.day_index) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDay,
                index,
                format!("Row {index} has unknown day '{}' (index {})", row.day, row.day_index),
            ));
        }

        if times_valid && row.end_minutes() <= row.start_minutes() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                index,
                format!("Row {index} ends at {} but starts at {}", row.end, row.start),
            ));
        }
    }

    if let Some(overlap_err) = detect_mandatory_overlap(rows) {
        errors.push(overlap_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Finds the first pair of overlapping mandatory rows.
fn detect_mandatory_overlap(rows: &[Row]) -> Option<ValidationError> {
    let mandatory: Vec<(usize, Event)> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.mandatory)
        .map(|(i, r)| (i, Event::from_row(r)))
        .collect();

    for (position, (left_index, left)) in mandatory.iter().enumerate() {
        for (right_index, right) in &mandatory[position + 1..] {
            if left.overlaps(right) {
                return Some(ValidationError::new(
                    ValidationErrorKind::MandatoryOverlap,
                    *right_index,
                    format!(
                        "Mandatory rows {left_index} ({} {}-{}) and {right_index} ({} {}-{}) overlap",
                        left.unit, left.start, left.end, right.unit, right.start, right.end
                    ),
                ));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::new("FIS", "OBR", "OBR").on_day("SEG", 1).between("08:00", "10:00").mandatory(),
            Row::new("API", "T", "T1").on_day("SEG", 1).between("10:00", "12:00"),
            Row::new("API", "T", "T2").on_day("TER", 2).between("08:00", "10:00"),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_rows(&sample_rows()).is_ok());
        assert!(validate_rows(&[]).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let rows = vec![Row::new(" ", "T", "").on_day("SEG", 1).between("08:00", "10:00")];

        let errors = validate_rows(&rows).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingField);
        assert!(errors[0].message.contains("unit, option code"));
    }

    #[test]
    fn test_mandatory_rows_may_omit_fields() {
        let rows = vec![Row::new("FIS", "", "").on_day("SEG", 1).between("08:00", "10:00").mandatory()];
        assert!(validate_rows(&rows).is_ok());
    }

    #[test]
    fn test_invalid_time() {
        let rows = vec![Row::new("API", "T", "T1").on_day("SEG", 1).between("8h", "10:00")];

        let errors = validate_rows(&rows).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidTime);
        assert!(errors[0].message.contains("start"));
    }

    #[test]
    fn test_unknown_day() {
        let rows = vec![Row::new("API", "T", "T1").on_day("???", 0).between("08:00", "10:00")];

        let errors = validate_rows(&rows).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::UnknownDay));
    }

    #[test]
    fn test_non_positive_duration() {
        let rows = vec![
            Row::new("API", "T", "T1").on_day("SEG", 1).between("10:00", "10:00"),
            Row::new("API", "T", "T2").on_day("SEG", 1).between("11:00", "09:00"),
        ];

        let errors = validate_rows(&rows).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::NonPositiveDuration));
        assert_eq!(errors[1].row, 1);
    }

    #[test]
    fn test_mandatory_overlap() {
        let mut rows = sample_rows();
        rows.push(Row::new("QUI", "OBR", "OBR").on_day("SEG", 1).between("09:00", "11:00").mandatory());

        let errors = validate_rows(&rows).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MandatoryOverlap);
        assert_eq!(errors[0].row, 3);
    }

    #[test]
    fn test_option_overlap_is_not_an_error() {
        let rows = vec![
            Row::new("API", "T", "T1").on_day("SEG", 1).between("08:00", "10:00"),
            Row::new("ES", "TP", "TP1").on_day("SEG", 1).between("09:00", "11:00"),
        ];
        assert!(validate_rows(&rows).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let rows = vec![
            Row::new("", "T", "T1").on_day("SEG", 1).between("08:00", "10:00"),
            Row::new("API", "T", "T1").on_day("", 9).between("xx", "10:00"),
        ];

        let errors = validate_rows(&rows).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
