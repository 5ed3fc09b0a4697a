//! Field parsing for point-of-sale exports.
//!
//! Timestamps arrive in whatever format the exporting app was configured
//! with, so parsing tries a list of `chrono` formats in order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Timestamp formats tried when a dataset definition does not list its own.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d",
    "%d/%m/%Y",
];

/// Parses a timestamp using the first matching format.
///
/// Date-only formats yield midnight. Timestamps with a UTC offset keep
/// their wall-clock time; the offset is dropped. Returns `None` for empty
/// or unparseable input.
#[must_use]
pub fn parse_timestamp(s: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    formats.iter().find_map(|format| {
        DateTime::parse_from_str(s, format)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(s, format))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    })
}

/// Parses a monetary value. Returns `None` for empty or unparseable input.
///
/// With `decimal_comma`, `.` is treated as a thousands separator and `,` as
/// the decimal point (`"1.234,50"` → `1234.5`).
#[must_use]
pub fn parse_value(s: &str, decimal_comma: bool) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let value = if decimal_comma {
        s.replace('.', "").replace(',', ".").parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };

    value.is_finite().then_some(value)
}

/// Returns the trimmed field, or `None` if it is empty.
#[must_use]
pub fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}
