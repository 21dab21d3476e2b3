//! Display formatters used while rendering certificate rows.
//!
//! All functions are total: malformed input yields an empty (or passed-through)
//! string, never an error.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// `dd-MM-yyyy HH:mm:ss` (or with a literal `T`), matched as a prefix.
static DAY_FIRST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})-(\d{2})-(\d{4})[ T](\d{2}):(\d{2}):(\d{2})")
        .expect("day-first date pattern is a valid regex")
});

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const FILE_SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Normalize a backend date string to `dd/MM/yyyy`.
///
/// Accepts the backend's `dd-MM-yyyy HH:mm:ss` pattern as well as ISO-8601
/// style strings. Returns an empty string for empty or unparsable input.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    match parse_date(value) {
        Some(date) => format_date_value(date),
        None => {
            tracing::trace!(value, "Unrecognized date value");
            String::new()
        }
    }
}

pub fn format_date_value(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_datetime_value(value: NaiveDateTime) -> String {
    format_date_value(value.date())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Some(captures) = DAY_FIRST_PATTERN.captures(value) {
        let number = |index: usize| captures.get(index)?.as_str().parse::<u32>().ok();
        let year = captures.get(3)?.as_str().parse::<i32>().ok()?;
        let date = NaiveDate::from_ymd_opt(year, number(2)?, number(1)?)?;
        // Out-of-range clock values make the whole value invalid.
        NaiveTime::from_hms_opt(number(4)?, number(5)?, number(6)?)?;
        return Some(date);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.date_naive());
    }

    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.date())
        .or_else(|| {
            ISO_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
}

/// Map a download status code to its display label.
///
/// Matching is case-insensitive; unknown codes pass through unchanged.
pub fn format_download_status(value: Option<&str>) -> String {
    let value = value.unwrap_or_default();
    match value.to_uppercase().as_str() {
        "OK" => "COMPLETADO".to_string(),
        "ERROR" => "ERROR".to_string(),
        "PENDIENTE" => "PENDIENTE".to_string(),
        _ => value.to_string(),
    }
}

/// Human readable size with two decimals, e.g. `1536` -> `"1.50 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= 1024.0 && unit < FILE_SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", scaled, FILE_SIZE_UNITS[unit])
}
