//! Turn-selection export.
//!
//! Projects schedules onto a three-sheet [`Workbook`]:
//!
//! | Sheet      | One line per | Columns |
//! |------------|--------------|---------|
//! | Schedules  | schedule     | ID, seven turn columns, Seg … Sex |
//! | Selections | selection    | Chave, Turno |
//! | Events     | event        | Schedule, UC, Tipo, Turno, Dia, Inicio, Fim, Obrigatorio |
//!
//! The Schedules sheet uses the legacy layout and the Events sheet the
//! structured one, so [`read_workbook`](super::read_workbook) accepts the
//! result (it prefers "Events").

use serde::{Deserialize, Serialize};

use super::workbook::{Sheet, Workbook};
use crate::models::{Event, Schedule};

/// Turn columns in sheet order.
pub const TURN_COLUMNS: [&str; 7] = ["API_T", "API_PL", "ES_TP", "ES_PL", "IA_PL", "SI_PL", "SBD_PL"];

/// Weekday columns in sheet order.
pub const WEEKDAY_COLUMNS: [&str; 5] = ["Seg", "Ter", "Qua", "Qui", "Sex"];

const EVENT_COLUMNS: [&str; 8] = ["Schedule", "UC", "Tipo", "Turno", "Dia", "Inicio", "Fim", "Obrigatorio"];

/// One line of the Schedules sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRow {
    /// Numeric schedule identifier.
    pub id: String,
    /// Chosen option per [`TURN_COLUMNS`] entry; empty when not chosen.
    pub turns: [String; 7],
    /// `"HH:MM-HH:MM NAME | …"` per [`WEEKDAY_COLUMNS`] entry.
    pub days: [String; 5],
}

impl TurnRow {
    /// Projects a schedule. `fallback_id` is used when the key holds no
    /// digits.
    pub fn from_schedule(schedule: &Schedule, fallback_id: usize) -> Self {
        let mut row = TurnRow {
            id: numeric_id(&schedule.key).unwrap_or_else(|| fallback_id.to_string()),
            ..TurnRow::default()
        };
        let mut day_entries: [Vec<(&str, String)>; 5] = Default::default();

        for event in &schedule.events {
            let unit = event.unit.to_uppercase();
            let class_type = event.class_type.to_uppercase();
            let option_code = event.option_code.to_uppercase();

            if let Some(day) = weekday_slot(event) {
                if !event.start.is_empty() && !event.end.is_empty() {
                    let name = entry_name(&unit, &class_type, &option_code, event.mandatory);
                    day_entries[day].push((
                        event.start.as_str(),
                        format!("{}-{} {name}", event.start, event.end),
                    ));
                }
            }

            if event.mandatory || option_code.is_empty() {
                continue;
            }

            if let Some(column) = turn_column(&unit, normalize_class_type(&class_type)) {
                if row.turns[column].is_empty() {
                    row.turns[column] = option_code;
                }
            }
        }

        for (cell, mut entries) in row.days.iter_mut().zip(day_entries) {
            entries.sort_by(|a, b| a.0.cmp(b.0));
            *cell = entries
                .into_iter()
                .map(|(_, entry)| entry)
                .collect::<Vec<_>>()
                .join(" | ");
        }

        row
    }

    /// Turn value for a column name.
    pub fn turn(&self, column: &str) -> Option<&str> {
        TURN_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.turns[i].as_str())
    }

    /// Day cell for a weekday column name.
    pub fn day(&self, column: &str) -> Option<&str> {
        WEEKDAY_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.days[i].as_str())
    }

    fn cells(&self) -> Vec<String> {
        std::iter::once(self.id.clone())
            .chain(self.turns.iter().cloned())
            .chain(self.days.iter().cloned())
            .collect()
    }
}

/// Builds the export workbook.
///
/// `selections` are `(key, option)` pairs, e.g. `("API_T", "T1")`.
pub fn export_workbook(selections: &[(String, String)], schedules: &[Schedule]) -> Workbook {
    let mut schedule_sheet = Sheet::new("Schedules").with_row(
        std::iter::once("ID")
            .chain(TURN_COLUMNS)
            .chain(WEEKDAY_COLUMNS),
    );
    for (position, schedule) in schedules.iter().enumerate() {
        schedule_sheet.push_row(TurnRow::from_schedule(schedule, position + 1).cells());
    }

    let mut selection_sheet = Sheet::new("Selections").with_row(["Chave", "Turno"]);
    for (key, option) in selections {
        selection_sheet.push_row([key.as_str(), option.as_str()]);
    }

    let mut event_sheet = Sheet::new("Events").with_row(EVENT_COLUMNS);
    for schedule in schedules {
        for event in &schedule.events {
            event_sheet.push_row([
                schedule.key.as_str(),
                event.unit.as_str(),
                event.class_type.as_str(),
                event.option_code.as_str(),
                event.day.as_str(),
                event.start.as_str(),
                event.end.as_str(),
                if event.mandatory { "sim" } else { "nao" },
            ]);
        }
    }

    log::debug!(
        "exported {} schedules and {} selections",
        schedules.len(),
        selections.len()
    );

    Workbook::new()
        .with_sheet(schedule_sheet)
        .with_sheet(selection_sheet)
        .with_sheet(event_sheet)
}

/// Digits of the first digit run, without leading zeros.
fn numeric_id(key: &str) -> Option<String> {
    let digits: String = key
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u64>().map(|n| n.to_string()).unwrap_or(digits))
}

/// Weekday column position, by day index first and day name second.
fn weekday_slot(event: &Event) -> Option<usize> {
    if (1..=5).contains(&event.day_index) {
        return Some(usize::from(event.day_index) - 1);
    }
    match event.day.trim().to_uppercase().as_str() {
        "SEG" | "SEGUNDA" => Some(0),
        "TER" | "TERCA" | "TERÇA" => Some(1),
        "QUA" | "QUARTA" => Some(2),
        "QUI" | "QUINTA" => Some(3),
        "SEX" | "SEXTA" => Some(4),
        _ => None,
    }
}

fn normalize_class_type(class_type: &str) -> &'static str {
    if class_type.starts_with("TP") {
        "TP"
    } else if class_type.starts_with("PL") {
        "PL"
    } else {
        "T"
    }
}

fn turn_column(unit: &str, class_type: &str) -> Option<usize> {
    let column = match (unit, class_type) {
        ("API", "T") => "API_T",
        ("API", "PL") => "API_PL",
        ("ES", "TP") => "ES_TP",
        ("ES", "PL") => "ES_PL",
        ("IA", "PL") => "IA_PL",
        ("SI", "PL") => "SI_PL",
        ("SBD", "PL") => "SBD_PL",
        _ => return None,
    };
    TURN_COLUMNS.iter().position(|c| *c == column)
}

fn entry_name(unit: &str, class_type: &str, option_code: &str, mandatory: bool) -> String {
    let label = if mandatory && option_code == "OBR" {
        "OBR"
    } else if option_code.is_empty() {
        class_type
    } else {
        option_code
    };
    format!("{unit} {label}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;
    use crate::sheet::{read_sheet, read_workbook, SheetLayout};

    fn sample_schedule(key: &str) -> Schedule {
        let rows = [
            Row::new("API", "T", "T1").on_day("Seg", 1).between("08:00", "10:00"),
            Row::new("API", "PL", "PL2").on_day("Qui", 4).between("09:00", "11:00"),
            Row::new("SBD", "OBR", "OBR").on_day("Sex", 5).between("17:00", "19:00").mandatory(),
            Row::new("ES", "TP", "TP1").on_day("Seg", 1).between("07:00", "08:00"),
            Row::new("SI", "PL", "PL1").on_day("Sab", 6).between("09:00", "10:00"),
        ];
        Schedule::from_events(key, rows.iter().map(Event::from_row).collect())
    }

    #[test]
    fn test_turn_row_projection() {
        let row = TurnRow::from_schedule(&sample_schedule("ID 77"), 1);

        assert_eq!(row.id, "77");
        assert_eq!(row.turn("API_T"), Some("T1"));
        assert_eq!(row.turn("API_PL"), Some("PL2"));
        assert_eq!(row.turn("ES_TP"), Some("TP1"));
        // Saturday events have no day cell but still fill their turn
        assert_eq!(row.turn("SI_PL"), Some("PL1"));
        assert_eq!(row.turn("SBD_PL"), Some(""));
        assert_eq!(row.day("Seg"), Some("07:00-08:00 ES TP1 | 08:00-10:00 API T1"));
        assert_eq!(row.day("Qui"), Some("09:00-11:00 API PL2"));
        assert_eq!(row.day("Sex"), Some("17:00-19:00 SBD OBR"));
        assert_eq!(row.day("Ter"), Some(""));
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id("Auto 003").as_deref(), Some("3"));
        assert_eq!(numeric_id("v12b34").as_deref(), Some("12"));
        assert_eq!(numeric_id("Manual"), None);

        let row = TurnRow::from_schedule(&sample_schedule("Manual"), 4);
        assert_eq!(row.id, "4");
    }

    #[test]
    fn test_first_turn_wins() {
        let rows = [
            Row::new("api", "pl", "pl1").on_day("Seg", 1).between("08:00", "10:00"),
            Row::new("API", "PL", "PL2").on_day("Ter", 2).between("08:00", "10:00"),
        ];
        let schedule = Schedule::from_events("1", rows.iter().map(Event::from_row).collect());
        let row = TurnRow::from_schedule(&schedule, 1);
        assert_eq!(row.turn("API_PL"), Some("PL1"));
    }

    #[test]
    fn test_workbook_sheets() {
        let selections = vec![("API_T".to_string(), "T1".to_string())];
        let workbook = export_workbook(&selections, &[sample_schedule("Auto 001")]);

        let names: Vec<_> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Schedules", "Selections", "Events"]);

        let schedules = workbook.sheet("Schedules").unwrap();
        assert_eq!(schedules.header().unwrap().len(), 13);
        assert_eq!(schedules.body()[0][0].text(), "1");

        let selection = workbook.sheet("Selections").unwrap();
        assert_eq!(selection.body()[0][1].text(), "T1");

        let events = workbook.sheet("Events").unwrap();
        assert_eq!(events.body().len(), 5);
        assert!(events.body().iter().any(|r| r[7].text() == "sim"));
    }

    #[test]
    fn test_events_sheet_reads_back() {
        let workbook = export_workbook(&[], &[sample_schedule("Auto 001")]);
        let read = read_workbook(&workbook).unwrap();

        assert_eq!(read.meta.sheet_name, "Events");
        assert_eq!(read.meta.layout, SheetLayout::Structured);
        assert_eq!(read.rows.len(), 5);
        assert!(read.rows.iter().all(|r| r.schedule_key == "Auto 001"));
        let fixed: Vec<_> = read.rows.iter().filter(|r| r.mandatory).collect();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].unit, "SBD");
    }

    #[test]
    fn test_schedules_sheet_reads_back() {
        let workbook = export_workbook(&[], &[sample_schedule("Auto 002")]);
        let read = read_sheet(workbook.sheet("Schedules").unwrap()).unwrap();

        assert_eq!(read.meta.layout, SheetLayout::Legacy);
        // the Saturday session has no weekday cell
        assert_eq!(read.rows.len(), 4);
        assert!(read.rows.iter().all(|r| r.schedule_key == "2"));

        let api_t = read.rows.iter().find(|r| r.unit == "API" && r.class_type == "T").unwrap();
        assert_eq!(api_t.option_code, "T1");
        assert!(!api_t.mandatory);
        let sbd = read.rows.iter().find(|r| r.unit == "SBD").unwrap();
        assert!(sbd.mandatory);
    }
}
