//! Timetable combination engine.
//!
//! Turns a flat list of class sessions into conflict-free weekly timetables:
//! every mandatory session plus exactly one option per (unit, class type)
//! choice, ranked by compactness.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Row`, `Event`, `Schedule`, `Unit`, `Catalog`
//! - **`scheduler`**: Row grouping, fair bounded combination search, catalog
//!   building and schedule metrics
//! - **`validation`**: Input integrity checks (missing fields, bad times,
//!   colliding mandatory sessions)
//! - **`text`**: Free-text turn-selection parser
//! - **`sheet`**: In-memory workbook model, row reader and export projection
//! - **`explorer`**: One-call pipeline from a row source to a ranked view
//!
//! # Example
//!
//! ```
//! use u_timetable::models::Row;
//! use u_timetable::scheduler::{AutoScheduler, CatalogBuilder};
//!
//! let rows = vec![
//!     Row::new("API", "T", "T1").on_day("SEG", 1).between("08:00", "10:00"),
//!     Row::new("API", "T", "T2").on_day("TER", 2).between("08:00", "10:00"),
//!     Row::new("FIS", "OBR", "OBR").on_day("SEG", 1).between("10:00", "12:00").mandatory(),
//! ];
//!
//! let generated = AutoScheduler::new().generate(&rows);
//! let catalog = CatalogBuilder::new().build(&generated);
//!
//! assert_eq!(catalog.schedules.len(), 2);
//! assert_eq!(catalog.best().unwrap().metrics.days_count, 1);
//! ```

pub mod error;
pub mod explorer;
pub mod models;
pub mod scheduler;
pub mod sheet;
pub mod text;
pub mod validation;

pub use error::{Result, TimetableError};
