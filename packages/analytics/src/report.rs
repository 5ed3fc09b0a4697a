//! The render pass: one load-independent run of filter → aggregate →
//! project over an immutable record set.
//!
//! A pass holds no state between calls. The caller loads records, builds a
//! [`Selection`], and gets back an immutable [`PassOutcome`] for the
//! presentation layer.

use sales_map_analytics_models::{
    HourlyDetail, PassOptions, PassOutcome, Report, Selection, SelectionError,
};
use sales_map_sales_models::SalesRecord;

use crate::aggregate::{group_by_date, group_by_hour};
use crate::filter;
use crate::projection::map_view;

/// Runs one render pass.
///
/// # Errors
///
/// Returns [`SelectionError`] if the selection is inconsistent. An empty
/// match is reported as [`PassOutcome::NoData`], not as an error.
pub fn render_pass(
    records: &[SalesRecord],
    selection: &Selection,
    options: &PassOptions,
) -> Result<PassOutcome, SelectionError> {
    let filtered = filter::apply(records, selection)?;

    if filtered.is_empty() {
        log::info!("No records match the selected filters");
        return Ok(PassOutcome::NoData {
            selection: *selection,
        });
    }

    let map = if options.include_map {
        map_view(filtered.iter().copied())
    } else {
        None
    };

    let by_date = group_by_date(filtered.iter().copied(), options.locale);

    let hourly = match options.hourly_detail {
        HourlyDetail::Always => true,
        HourlyDetail::SingleDateOnly => selection.dates.is_single(),
        HourlyDetail::Never => false,
    };
    let by_hour = hourly.then(|| group_by_hour(filtered.iter().copied()));

    Ok(PassOutcome::Report(Report {
        selection: *selection,
        record_count: filtered.len() as u64,
        map,
        by_date,
        by_hour,
    }))
}
