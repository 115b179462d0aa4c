// 🕒 Timestamp Formats
// Stores are written as "YYYY-MM-DD HH:MM" and read leniently:
// ISO forms first, then day-first forms, then bare dates.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Canonical on-disk format
pub const STORE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format used when showing a delivery estimate
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

const ISO_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DAY_FIRST_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
];

const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];

/// Parse a stored timestamp, or `None` if no known format fits
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    ISO_FORMATS
        .iter()
        .chain(DAY_FIRST_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_ONLY_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(STORE_FORMAT).to_string()
}

pub fn format_display(ts: &NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Current local wall-clock time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
