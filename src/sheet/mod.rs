//! Spreadsheet grids.
//!
//! - [`workbook`]: neutral in-memory cell grid
//! - [`reader`]: rows out of a grid (structured and legacy layouts)
//! - [`export`]: schedules into a grid

pub mod export;
pub mod reader;
pub mod workbook;

pub use export::{export_workbook, TurnRow, TURN_COLUMNS, WEEKDAY_COLUMNS};
pub use reader::{
    normalize_header, read_sheet, read_workbook, SheetLayout, SheetMeta, SheetRead,
    DEFAULT_SCHEDULE_KEY, MANDATORY_OPTION_CODE, OTHER_UNIT,
};
pub use workbook::{Cell, Sheet, Workbook};
