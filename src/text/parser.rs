//! Turn-selection text parser.
//!
//! Recognizes two kinds of fragments in pasted text:
//!
//! - **Selections**: `API T1`, `ES-TP2`, `SBD OBR` (unit, kind, suffix).
//! - **Sessions**: `Seg 08:00-10:00 API T1` (day, time range, unit, kind,
//!   suffix).
//!
//! Kinds are `T`, `TP`, `PL`, `IAT` (read as `T`) and `OBR` (mandatory).
//! Input is uppercased first, so matching is case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SELECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][A-Z0-9]{1,15})\s*[-:.]?\s*(T|TP|PL|IAT|OBR)\s*[-:.]?\s*([0-9]+|OBR)?\b")
        .expect("valid selection pattern")
});

static SESSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(SEG|SEGUNDA|TER|TERCA|TERÇA|QUA|QUARTA|QUI|QUINTA|SEX|SEXTA|SAB|SÁB|SABADO|SÁBADO|DOM|DOMINGO)",
        r"\s+([0-9]{1,2}:[0-9]{2})\s*[-–]\s*([0-9]{1,2}:[0-9]{2})",
        r"\s+([A-Z][A-Z0-9]{1,15})\s+(TP|PL|IAT|T|OBR)\s*([0-9]+|OBR)?\b",
    ))
    .expect("valid session pattern")
});

/// One timed session line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Normalized 3-letter day (`SEG` … `DOM`).
    pub day: String,
    /// Zero-padded start, "HH:MM".
    pub start: String,
    /// Zero-padded end, "HH:MM".
    pub end: String,
    /// Unit name.
    pub unit: String,
    /// Class type (`T`, `TP`, `PL`, `OBR`).
    pub class_type: String,
    /// Option code, e.g. `PL2`, or `OBR`.
    pub option_code: Option<String>,
}

/// Everything recognized in a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSelection {
    /// `UNIT_CLASSTYPE` → option code, first-seen order, later wins.
    pub selections: Vec<(String, String)>,
    /// Session lines in text order.
    pub sessions: Vec<Session>,
    /// Display tokens, deduplicated, first-seen order.
    pub tokens: Vec<String>,
}

impl ParsedSelection {
    /// Whether anything was recognized.
    pub fn has_matches(&self) -> bool {
        !self.selections.is_empty() || !self.sessions.is_empty()
    }

    /// Selected option code for a `UNIT_CLASSTYPE` key.
    pub fn selection(&self, key: &str) -> Option<&str> {
        self.selections
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn select(&mut self, key: String, option_code: String) {
        match self.selections.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = option_code,
            None => self.selections.push((key, option_code)),
        }
    }

    fn push_token(&mut self, token: String) {
        if !self.tokens.contains(&token) {
            self.tokens.push(token);
        }
    }
}

/// Parses turn-selection text.
pub fn parse_selection_text(text: &str) -> ParsedSelection {
    let normalized = text.to_uppercase();
    let mut parsed = ParsedSelection::default();
    let mut tokens = Vec::new();

    for caps in SELECTION_PATTERN.captures_iter(&normalized) {
        let unit = &caps[1];
        let kind = &caps[2];
        let suffix = caps.get(3).map_or("", |m| m.as_str());

        let (class_type, option_code) = classify(kind, suffix);
        parsed.select(format!("{unit}_{class_type}"), option_code.clone());
        tokens.push(format!("{unit} {option_code}").trim().to_string());
    }

    for caps in SESSION_PATTERN.captures_iter(&normalized) {
        let day = normalize_day(&caps[1]);
        let start = normalize_time(&caps[2]);
        let end = normalize_time(&caps[3]);
        let unit = caps[4].to_string();
        let kind = &caps[5];
        let suffix = caps.get(6).map_or("", |m| m.as_str());

        let (class_type, option_code) = classify(kind, suffix);
        let label = if option_code.is_empty() { &class_type } else { &option_code };
        tokens.push(format!("{day} {start}-{end} {unit} {label}").trim().to_string());

        parsed.sessions.push(Session {
            day,
            start,
            end,
            unit,
            class_type,
            option_code: (!option_code.is_empty()).then_some(option_code),
        });
    }

    for token in tokens {
        parsed.push_token(token);
    }

    if !parsed.has_matches() {
        log::warn!("no selection or session recognized in {} chars of text", text.len());
    }

    parsed
}

/// Maps a kind and suffix to (class type, option code).
fn classify(kind: &str, suffix: &str) -> (String, String) {
    match kind {
        "OBR" => ("OBR".to_string(), "OBR".to_string()),
        "IAT" => ("T".to_string(), format!("{kind}{suffix}")),
        _ => (kind.to_string(), format!("{kind}{suffix}")),
    }
}

/// Normalizes a day alias to its 3-letter form.
pub fn normalize_day(value: &str) -> String {
    let normalized = value.trim().to_uppercase();
    let short = match normalized.as_str() {
        "SEG" | "SEGUNDA" => "SEG",
        "TER" | "TERCA" | "TERÇA" => "TER",
        "QUA" | "QUARTA" => "QUA",
        "QUI" | "QUINTA" => "QUI",
        "SEX" | "SEXTA" => "SEX",
        "SAB" | "SÁB" | "SABADO" | "SÁBADO" => "SAB",
        "DOM" | "DOMINGO" => "DOM",
        _ => return normalized,
    };
    short.to_string()
}

/// Zero-pads "H:MM" to "HH:MM".
pub fn normalize_time(value: &str) -> String {
    let mut parts = value.trim().splitn(2, ':');
    let hour: u32 = parts.next().and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
    format!("{hour:02}:{minute:02}")
}
