//! Date and hour filters.
//!
//! Filters borrow from the loaded record set and return a new subset; the
//! loaded set is never modified. Date and hour filters are plain predicate
//! conjunctions, so the order they are applied in does not matter.

use sales_map_analytics_models::{DateSelection, HourRange, Selection, SelectionError};
use sales_map_sales_models::SalesRecord;

/// Keeps records whose date matches `dates`.
pub fn filter_dates<'a, I>(records: I, dates: &DateSelection) -> Vec<&'a SalesRecord>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .filter(|r| dates.matches(r.date()))
        .collect()
}

/// Keeps records whose hour falls in `hours`, inclusive.
pub fn filter_hours<'a, I>(records: I, hours: HourRange) -> Vec<&'a SalesRecord>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .filter(|r| hours.contains(r.hour()))
        .collect()
}

/// Validates `selection`, then applies its date and hour constraints.
///
/// An empty result is a valid outcome.
///
/// # Errors
///
/// Returns [`SelectionError`] if the selection is inconsistent; no
/// filtering is attempted in that case.
pub fn apply<'a>(
    records: &'a [SalesRecord],
    selection: &Selection,
) -> Result<Vec<&'a SalesRecord>, SelectionError> {
    selection.dates.validate()?;

    let filtered: Vec<&SalesRecord> = records
        .iter()
        .filter(|r| selection.dates.matches(r.date()) && selection.hours.contains(r.hour()))
        .collect();

    log::debug!(
        "Selection {:?} / hours {}-{} kept {} of {} records",
        selection.dates,
        selection.hours.start(),
        selection.hours.end(),
        filtered.len(),
        records.len()
    );

    Ok(filtered)
}
