//! Error types for the collaborator surfaces.
//!
//! The scheduling core never fails; only text parsing and sheet reading
//! report errors.

/// Result type for collaborator operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Error type for collaborator operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimetableError {
    #[error("no session line found; expected e.g. \"Seg 08:00-10:00 API T1\"")]
    NoSessions,

    #[error("workbook has no sheets")]
    EmptyWorkbook,

    #[error("sheet '{sheet}' is missing required columns: {}", columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },
}
