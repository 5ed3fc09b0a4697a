//! Observed date and hour bounds of a record set.
//!
//! Used to seed default selections and to validate what the user picked.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sales_map_analytics_models::{DateBounds, DateSelection, HourBounds};
use sales_map_sales_models::SalesRecord;

/// Distinct dates present, ascending.
pub fn distinct_dates<'a, I>(records: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .map(SalesRecord::date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Earliest and latest date, or `None` for an empty set.
pub fn date_bounds<'a, I>(records: I) -> Option<DateBounds>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records.into_iter().map(SalesRecord::date).fold(None, |acc, date| {
        Some(match acc {
            None => DateBounds {
                min: date,
                max: date,
            },
            Some(b) => DateBounds {
                min: b.min.min(date),
                max: b.max.max(date),
            },
        })
    })
}

/// Earliest and latest hour, or `None` for an empty set.
pub fn hour_bounds<'a, I>(records: I) -> Option<HourBounds>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records.into_iter().map(SalesRecord::hour).fold(None, |acc, hour| {
        Some(match acc {
            None => HourBounds {
                min: hour,
                max: hour,
            },
            Some(b) => HourBounds {
                min: b.min.min(hour),
                max: b.max.max(hour),
            },
        })
    })
}

/// Default pair selection: the first and last observed dates.
#[must_use]
pub const fn default_pair(bounds: &DateBounds) -> DateSelection {
    DateSelection::Pair {
        first: bounds.min,
        second: bounds.max,
    }
}
