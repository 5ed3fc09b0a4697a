//! Record builders shared by the unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use sales_map_sales_models::SalesRecord;

/// A record at `ts` (`"YYYY-MM-DD HH:MM"`) with the given location.
pub fn at(ts: &str, location: &str) -> SalesRecord {
    SalesRecord::new(parse(ts), location, None, None)
}

/// A valued record at `ts`.
pub fn sale(ts: &str, value: f64) -> SalesRecord {
    SalesRecord::new(parse(ts), "-23.5,-46.6", Some("Ana".to_string()), Some(value))
}

/// March 2025 date helper.
pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn parse(ts: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap()
}
