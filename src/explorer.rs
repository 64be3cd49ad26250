//! Schedule explorer.
//!
//! Ties the pieces together for one browsing request. Hand-typed rows are
//! expanded by the combination search before ranking; spreadsheet rows are
//! already labeled and go straight to the catalog.
//!
//! ```text
//! Text(rows)  ─▶ AutoScheduler ─▶ CatalogBuilder ─▶ schedules
//!      └──────────────────────────▶ CatalogBuilder ─▶ units
//! Sheet(read) ─────────────────────▶ CatalogBuilder ─▶ schedules + units
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{Catalog, Row, Schedule, Unit};
use crate::scheduler::{AutoScheduler, CatalogBuilder, SearchConfig};
use crate::sheet::SheetRead;
use crate::validation::validate_rows;

/// Sheet name reported for text input.
pub const TEXT_SHEET_NAME: &str = "TextInput";

/// Where the rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerSource {
    /// Rows typed in by hand; every option is a choice to combine.
    Text(Vec<Row>),
    /// Rows read from a workbook; schedules are already labeled.
    Sheet(SheetRead),
}

/// Summary of an explorer view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerMeta {
    pub sheet_name: String,
    pub source_rows: usize,
    pub total_schedules: usize,
    pub total_units: usize,
}

/// Ranked schedules and unit catalog ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerView {
    pub meta: ExplorerMeta,
    pub schedules: Vec<Schedule>,
    pub units: Vec<Unit>,
}

/// Builds [`ExplorerView`]s.
///
/// # Example
///
/// ```
/// use u_timetable::explorer::{ExplorerSource, ScheduleExplorer};
/// use u_timetable::text::rows_from_text;
///
/// let rows = rows_from_text("Seg 08:00-10:00 API T1\nTer 08:00-10:00 API T2").unwrap();
/// let view = ScheduleExplorer::new().explore(ExplorerSource::Text(rows));
/// assert_eq!(view.meta.total_schedules, 2);
/// assert_eq!(view.meta.total_units, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleExplorer {
    scheduler: AutoScheduler,
    catalogs: CatalogBuilder,
}

impl ScheduleExplorer {
    /// Creates an explorer with the default search cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an explorer with a search configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            scheduler: AutoScheduler::with_config(config),
            catalogs: CatalogBuilder::new(),
        }
    }

    /// Builds the view for a source.
    pub fn explore(&self, source: ExplorerSource) -> ExplorerView {
        match source {
            ExplorerSource::Text(rows) => {
                log::info!("exploring {} text rows", rows.len());
                report_findings(&rows);

                let generated = self.scheduler.generate(&rows);
                let generated_catalog = self.catalogs.build(&generated);
                let input_catalog = self.catalogs.build(&rows);

                view(
                    TEXT_SHEET_NAME.to_string(),
                    generated.len(),
                    generated_catalog.schedules,
                    input_catalog.units,
                )
            }
            ExplorerSource::Sheet(read) => {
                log::info!(
                    "exploring sheet '{}' ({} rows, {:?} layout)",
                    read.meta.sheet_name,
                    read.meta.source_rows,
                    read.meta.layout
                );
                report_findings(&read.rows);

                let Catalog { schedules, units } = self.catalogs.build(&read.rows);
                view(read.meta.sheet_name, read.meta.source_rows, schedules, units)
            }
        }
    }
}

fn view(sheet_name: String, source_rows: usize, schedules: Vec<Schedule>, units: Vec<Unit>) -> ExplorerView {
    ExplorerView {
        meta: ExplorerMeta {
            sheet_name,
            source_rows,
            total_schedules: schedules.len(),
            total_units: units.len(),
        },
        schedules,
        units,
    }
}

fn report_findings(rows: &[Row]) {
    if let Err(errors) = validate_rows(rows) {
        log::warn!("{} input issue(s) found", errors.len());
        for error in &errors {
            log::warn!("{:?}: {}", error.kind, error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::sheet::{export_workbook, read_workbook};
    use crate::text::rows_from_text;

    const TEXT: &str = "Seg 08:00-10:00 API T1\n\
                        Ter 09:30-12:30 ALNET PL1\n\
                        Seg 10:00-13:00 ALNET PL4\n\
                        Sex 14:00-16:00 SBD OBR";

    #[test]
    fn test_text_source() {
        let rows = rows_from_text(TEXT).unwrap();
        let view = ScheduleExplorer::new().explore(ExplorerSource::Text(rows));

        assert_eq!(view.meta.sheet_name, TEXT_SHEET_NAME);
        assert_eq!(view.meta.source_rows, 6);
        assert_eq!(view.meta.total_schedules, 2);
        assert_eq!(view.meta.total_units, 3);

        let best = &view.schedules[0];
        assert_eq!(best.key, "Auto 002");
        assert_eq!(best.metrics.days_count, 2);
        assert_eq!(best.chosen_option("ALNET", "PL"), Some("PL4"));

        let alnet = view.units.iter().find(|u| u.name == "ALNET").unwrap();
        assert_eq!(alnet.option_codes(), vec!["PL1", "PL4"]);
    }

    #[test]
    fn test_text_source_respects_cap() {
        let rows = rows_from_text(TEXT).unwrap();
        let explorer = ScheduleExplorer::with_config(SearchConfig::default().with_max_schedules(1));
        let view = explorer.explore(ExplorerSource::Text(rows));

        assert_eq!(view.meta.total_schedules, 1);
        assert_eq!(view.meta.source_rows, 3);
        // units still list every input option
        assert_eq!(view.meta.total_units, 3);
    }

    #[test]
    fn test_sheet_source() {
        let schedules: Vec<Schedule> = ["Auto 001", "Auto 002"]
            .iter()
            .zip([("T1", 1u8), ("T2", 2u8)])
            .map(|(key, (option, day))| {
                let row = Row::new("API", "T", option).on_day("Seg", day).between("08:00", "10:00");
                Schedule::from_events(*key, vec![Event::from_row(&row)])
            })
            .collect();
        let read = read_workbook(&export_workbook(&[], &schedules)).unwrap();

        let view = ScheduleExplorer::new().explore(ExplorerSource::Sheet(read));
        assert_eq!(view.meta.sheet_name, "Events");
        assert_eq!(view.meta.source_rows, 2);
        assert_eq!(view.meta.total_schedules, 2);
        assert_eq!(view.meta.total_units, 1);
        assert_eq!(view.units[0].option_codes(), vec!["T1", "T2"]);
    }

    #[test]
    fn test_conflicting_text_falls_back() {
        let rows = rows_from_text("Seg 08:00-10:00 API T1\nSeg 09:00-11:00 ES TP1").unwrap();
        let view = ScheduleExplorer::new().explore(ExplorerSource::Text(rows));

        assert_eq!(view.meta.total_schedules, 1);
        assert_eq!(view.schedules[0].key, "Manual 1");
        assert!(view.schedules[0].has_conflicts());
    }

    #[test]
    fn test_view_wire_shape() {
        let rows = rows_from_text(TEXT).unwrap();
        let view = ScheduleExplorer::new().explore(ExplorerSource::Text(rows));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["meta"]["sheetName"], "TextInput");
        assert_eq!(json["meta"]["totalSchedules"], 2);
    }
}
