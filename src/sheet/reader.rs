//! Spreadsheet row reader.
//!
//! Reads normalized rows out of a [`Workbook`]. Two layouts are understood:
//!
//! - **Structured**: one session per line with named columns (schedule,
//!   unit, option, type, day, start, end, mandatory). Header names are
//!   matched through aliases in Portuguese and English.
//! - **Legacy**: one schedule per line, an `ID` column, one turn column per
//!   (unit, component) pair holding the chosen option code, and one cell per
//!   weekday (`Seg` … `Sex`) listing `"HH:MM-HH:MM name | …"` entries.
//!
//! The legacy layout is recognized by the presence of id/seg/ter/qua/qui/sex
//! headers; everything else is read as structured.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::workbook::{Cell, Sheet, Workbook};
use crate::error::{Result, TimetableError};
use crate::models::Row;

/// Schedule key for structured rows without one.
pub const DEFAULT_SCHEDULE_KEY: &str = "Sem combinacao";
/// Option code for sessions that belong to no option.
pub const MANDATORY_OPTION_CODE: &str = "Obrigatorio";
/// Unit name for legacy entries with an unrecognized prefix.
pub const OTHER_UNIT: &str = "Outros";

const STRUCTURED_ALIASES: [(&str, &[&str]); 8] = [
    ("schedule", &["schedule", "horario", "combinacao", "combination", "id"]),
    ("unit", &["uc", "unidadecurricular", "unidade", "disciplina", "course", "subject"]),
    ("option", &["turno", "turma", "shift", "option", "class"]),
    ("type", &["tipo", "type", "component"]),
    ("day", &["dia", "day"]),
    ("start", &["inicio", "inicial", "start", "horainicio", "starttime"]),
    ("end", &["fim", "final", "end", "horafim", "endtime"]),
    ("mandatory", &["obrigatorio", "mandatory", "fixo", "required"]),
];

const REQUIRED_FIELDS: [&str; 4] = ["day", "start", "end", "unit"];

const LEGACY_DAY_COLUMNS: [(&str, &str, u8); 5] = [
    ("Seg", "seg", 1),
    ("Ter", "ter", 2),
    ("Qua", "qua", 3),
    ("Qui", "qui", 4),
    ("Sex", "sex", 5),
];

/// (turn column, normalized header, lowercase name prefix)
const LEGACY_TURN_COLUMNS: [(&str, &str, &str); 7] = [
    ("API_T", "apit", "api t"),
    ("API_PL", "apipl", "api pl"),
    ("ES_TP", "estp", "es tp"),
    ("ES_PL", "espl", "es pl"),
    ("IA_PL", "iapl", "ia pl"),
    ("SI_PL", "sipl", "si pl"),
    ("SBD_PL", "sbdpl", "sbd pl"),
];

static LEGACY_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<start>[0-9]{2}:[0-9]{2})-(?P<end>[0-9]{2}:[0-9]{2})\s+(?P<name>.+)$")
        .expect("valid legacy entry pattern")
});
static LEGACY_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(API|ES|IA|SI|SBD)\b").expect("valid unit pattern")
});
static LEGACY_THEORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bT[0-9]*\b").expect("valid theory pattern"));
static LEGACY_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:PL|TP|T|IAT)[0-9]+|OBR)\b")
        .expect("valid option pattern")
});
static CLOCK_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2})")
        .expect("valid clock pattern")
});

/// Which layout a sheet was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetLayout {
    Structured,
    Legacy,
}

/// What was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMeta {
    /// Title of the sheet that was read.
    pub sheet_name: String,
    /// Number of rows produced.
    pub source_rows: usize,
    /// Layout detected.
    pub layout: SheetLayout,
}

/// Rows read from a workbook plus their provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRead {
    pub rows: Vec<Row>,
    pub meta: SheetMeta,
}

/// Reads rows from the workbook's preferred sheet.
///
/// # Errors
/// - [`TimetableError::EmptyWorkbook`] when there is no sheet at all.
/// - [`TimetableError::MissingColumns`] when a structured sheet lacks the
///   day, start, end or unit column.
pub fn read_workbook(workbook: &Workbook) -> Result<SheetRead> {
    let sheet = workbook.preferred_sheet().ok_or(TimetableError::EmptyWorkbook)?;
    read_sheet(sheet)
}

/// Reads rows from one sheet.
pub fn read_sheet(sheet: &Sheet) -> Result<SheetRead> {
    let Some(header) = sheet.header() else {
        return Ok(SheetRead {
            rows: Vec::new(),
            meta: SheetMeta {
                sheet_name: sheet.name.clone(),
                source_rows: 0,
                layout: SheetLayout::Structured,
            },
        });
    };

    let columns = normalized_columns(header);
    let (rows, layout) = if is_legacy_layout(&columns) {
        (parse_legacy_rows(sheet.body(), &columns), SheetLayout::Legacy)
    } else {
        let fields = structured_fields(&columns);
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !fields.contains_key(*f))
            .map(|f| f.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TimetableError::MissingColumns {
                sheet: sheet.name.clone(),
                columns: missing,
            });
        }
        (parse_structured_rows(sheet.body(), &fields), SheetLayout::Structured)
    };

    log::debug!("read {} rows from sheet '{}' ({layout:?})", rows.len(), sheet.name);

    Ok(SheetRead {
        meta: SheetMeta {
            sheet_name: sheet.name.clone(),
            source_rows: rows.len(),
            layout,
        },
        rows,
    })
}

/// Normalized header → column index.
fn normalized_columns(header: &[Cell]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .map(|(index, cell)| (normalize_header(&cell.text()), index))
        .collect()
}

/// Field name → column index, first matching alias wins.
fn structured_fields(columns: &HashMap<String, usize>) -> HashMap<&'static str, usize> {
    STRUCTURED_ALIASES
        .iter()
        .filter_map(|(field, aliases)| {
            aliases
                .iter()
                .find_map(|alias| columns.get(*alias))
                .map(|&index| (*field, index))
        })
        .collect()
}

fn is_legacy_layout(columns: &HashMap<String, usize>) -> bool {
    ["id", "seg", "ter", "qua", "qui", "sex"]
        .iter()
        .all(|c| columns.contains_key(*c))
}

fn cell_at(row: &[Cell], index: Option<usize>) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    index.and_then(|i| row.get(i)).unwrap_or(&EMPTY)
}

fn is_empty_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

fn parse_structured_rows(body: &[Vec<Cell>], fields: &HashMap<&'static str, usize>) -> Vec<Row> {
    let field = |row: &[Cell], name: &str| -> Cell { cell_at(row, fields.get(name).copied()).clone() };
    let mut rows = Vec::new();

    for row in body {
        if is_empty_row(row) {
            continue;
        }

        let day = normalize_day_cell(&field(row, "day"));
        let start = normalize_time_cell(&field(row, "start"));
        let end = normalize_time_cell(&field(row, "end"));
        let unit = field(row, "unit").text();

        let (Some((day_name, day_index)), Some(start), Some(end)) = (day, start, end) else {
            continue;
        };
        if unit.is_empty() {
            continue;
        }

        let schedule_key = field(row, "schedule").text();
        let option_code = field(row, "option").text();
        let class_type = field(row, "type").text();
        let mandatory = is_truthy(&field(row, "mandatory")) || option_code.is_empty();

        rows.push(Row {
            schedule_key: if schedule_key.is_empty() {
                DEFAULT_SCHEDULE_KEY.to_string()
            } else {
                schedule_key
            },
            unit,
            option_code: if option_code.is_empty() {
                MANDATORY_OPTION_CODE.to_string()
            } else {
                option_code
            },
            class_type,
            day: day_name.to_string(),
            day_index,
            start,
            end,
            mandatory,
        });
    }

    rows
}

fn parse_legacy_rows(body: &[Vec<Cell>], columns: &HashMap<String, usize>) -> Vec<Row> {
    let id_column = columns.get("id").copied();
    let mut rows = Vec::new();

    for row in body {
        if is_empty_row(row) {
            continue;
        }

        let schedule_key = cell_at(row, id_column).text();
        if schedule_key.is_empty() {
            continue;
        }

        let selected: HashMap<&str, String> = LEGACY_TURN_COLUMNS
            .iter()
            .filter_map(|(field, header, _)| {
                let value = cell_at(row, columns.get(*header).copied()).text();
                (!value.is_empty()).then_some((*field, value))
            })
            .collect();

        for (day, header, day_index) in LEGACY_DAY_COLUMNS {
            let cell = cell_at(row, columns.get(header).copied()).text();

            for (start, end, name) in parse_legacy_cell(&cell) {
                let (option_code, mandatory) = match detect_turn_field(&name).and_then(|f| selected.get(f)) {
                    Some(chosen) => (chosen.clone(), false),
                    None => (
                        detect_option(&name).unwrap_or_else(|| MANDATORY_OPTION_CODE.to_string()),
                        true,
                    ),
                };

                rows.push(Row {
                    schedule_key: schedule_key.clone(),
                    unit: detect_unit(&name),
                    option_code,
                    class_type: detect_class_type(&name).to_string(),
                    day: day.to_string(),
                    day_index,
                    start,
                    end,
                    mandatory,
                });
            }
        }
    }

    rows
}

/// Splits a legacy day cell into (start, end, name) entries.
fn parse_legacy_cell(cell: &str) -> Vec<(String, String, String)> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Vec::new();
    }

    cell.split('|')
        .filter_map(|part| {
            let caps = LEGACY_ENTRY.captures(part.trim())?;
            Some((
                caps["start"].to_string(),
                caps["end"].to_string(),
                caps["name"].trim().to_string(),
            ))
        })
        .collect()
}

fn detect_turn_field(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_lowercase();
    LEGACY_TURN_COLUMNS
        .iter()
        .find(|(_, _, prefix)| lower.starts_with(prefix))
        .map(|(field, _, _)| *field)
}

fn detect_unit(name: &str) -> String {
    LEGACY_UNIT
        .captures(name.trim())
        .map(|caps| caps[1].to_uppercase())
        .unwrap_or_else(|| OTHER_UNIT.to_string())
}

fn detect_class_type(name: &str) -> &'static str {
    let upper = name.trim().to_uppercase();
    if upper.contains(" TP") {
        "TP"
    } else if upper.contains(" PL") {
        "PL"
    } else if upper.contains(" IAT") || LEGACY_THEORY.is_match(&upper) {
        "T"
    } else if upper.contains("OBR") {
        "OBR"
    } else {
        "OUTRO"
    }
}

fn detect_option(name: &str) -> Option<String> {
    LEGACY_OPTION
        .captures(name.trim())
        .map(|caps| caps[1].to_uppercase())
}

/// Lowercases, folds accents to ASCII and strips everything but `[a-z0-9]`.
pub fn normalize_header(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Maps a day name (Portuguese or English, short or long) to its display
/// name and index.
pub fn normalize_day_cell(cell: &Cell) -> Option<(&'static str, u8)> {
    let raw = cell.text().to_lowercase();
    let day = match raw.as_str() {
        "seg" | "segunda" | "segunda-feira" | "monday" => ("Segunda", 1),
        "ter" | "terca" | "terça" | "terca-feira" | "terça-feira" | "tuesday" => ("Terca", 2),
        "qua" | "quarta" | "quarta-feira" | "wednesday" => ("Quarta", 3),
        "qui" | "quinta" | "quinta-feira" | "thursday" => ("Quinta", 4),
        "sex" | "sexta" | "sexta-feira" | "friday" => ("Sexta", 5),
        "sab" | "sáb" | "sabado" | "sábado" | "saturday" => ("Sabado", 6),
        "dom" | "domingo" | "sunday" => ("Domingo", 7),
        _ => return None,
    };
    Some(day)
}

/// Reads a time cell: "H:MM…" text or a spreadsheet day fraction.
pub fn normalize_time_cell(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Number(value) => Some(day_fraction_to_clock(*value)),
        Cell::Text(text) => {
            let caps = CLOCK_PREFIX.captures(text.trim())?;
            let hour: u32 = caps["hour"].parse().ok()?;
            let minute: u32 = caps["minute"].parse().ok()?;
            Some(format!("{hour:02}:{minute:02}"))
        }
        Cell::Bool(_) | Cell::Empty => None,
    }
}

/// Converts a spreadsheet serial (days; the fraction is the time of day) to
/// "HH:MM".
fn day_fraction_to_clock(value: f64) -> String {
    let seconds = (value.fract().abs() * 86_400.0).round() as u32;
    let hour = (seconds / 3600) % 24;
    let minute = (seconds % 3600) / 60;
    format!("{hour:02}:{minute:02}")
}

fn is_truthy(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(value) => *value,
        Cell::Number(value) => value.trunc() as i64 == 1,
        Cell::Text(text) => matches!(
            text.trim().to_lowercase().as_str(),
            "1" | "sim" | "yes" | "true" | "x" | "obrigatorio" | "mandatory"
        ),
        Cell::Empty => false,
    }
}
