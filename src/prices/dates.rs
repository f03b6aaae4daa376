//! Date parsing for the price file's time axis

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Calendar formats accepted for the `Date` column, tried in order
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d-%b-%Y"];

/// Timestamp formats; the time of day is discarded
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a single date cell. Returns None if no known format matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts.date());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.date_naive())
}
