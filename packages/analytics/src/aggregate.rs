//! Group-by-date and group-by-hour aggregation.
//!
//! Output is sparse: only keys with at least one record appear, in
//! ascending key order. [`zero_fill_hours`] densifies an hour series for
//! charts that need a contiguous axis.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use sales_map_analytics_models::{DateGroup, HourGroup, HourRange};
use sales_map_sales_models::{Locale, SalesRecord};

/// Running count and value sum for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: u64,
    total: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        self.count += 1;
        if let Some(v) = value {
            *self.total.get_or_insert(0.0) += v;
        }
    }
}

fn accumulate<'a, K, I, F>(records: I, key: F) -> BTreeMap<K, Accumulator>
where
    K: Ord,
    I: IntoIterator<Item = &'a SalesRecord>,
    F: Fn(&SalesRecord) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record.value());
    }
    groups
}

/// Chart label for a date, e.g. `"2025-03-01 (Sábado)"`.
#[must_use]
pub fn date_label(date: NaiveDate, locale: Locale) -> String {
    format!(
        "{date} ({})",
        locale.capitalized_weekday_name(date.weekday())
    )
}

/// Groups records by calendar date, ascending.
pub fn group_by_date<'a, I>(records: I, locale: Locale) -> Vec<DateGroup>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    accumulate(records, SalesRecord::date)
        .into_iter()
        .map(|(date, acc)| DateGroup {
            date,
            weekday: date.weekday(),
            weekday_name: locale.capitalized_weekday_name(date.weekday()),
            label: date_label(date, locale),
            count: acc.count,
            total: acc.total,
        })
        .collect()
}

/// Groups records by hour of day, ascending.
pub fn group_by_hour<'a, I>(records: I) -> Vec<HourGroup>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    accumulate(records, SalesRecord::hour)
        .into_iter()
        .map(|(hour, acc)| HourGroup {
            hour,
            count: acc.count,
            total: acc.total,
        })
        .collect()
}

/// Returns one group per hour in `hours`, inserting zero-count groups for
/// hours missing from `groups`. Groups outside `hours` are dropped.
#[must_use]
pub fn zero_fill_hours(groups: &[HourGroup], hours: HourRange) -> Vec<HourGroup> {
    let by_hour: BTreeMap<u8, &HourGroup> = groups.iter().map(|g| (g.hour, g)).collect();

    hours
        .hours()
        .map(|hour| {
            by_hour.get(&hour).map_or(
                HourGroup {
                    hour,
                    count: 0,
                    total: None,
                },
                |g| (*g).clone(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, march, sale};

    #[test]
    fn groups_by_date_in_order() {
        let records = vec![
            at("2025-03-02 12:00", "1,1"),
            at("2025-03-01 09:00", "1,1"),
            at("2025-03-01 20:00", "1,1"),
        ];
        let groups = group_by_date(&records, Locale::EnUs);
        let summary: Vec<(NaiveDate, u64)> = groups.iter().map(|g| (g.date, g.count)).collect();
        assert_eq!(summary, vec![(march(1), 2), (march(2), 1)]);
        assert_eq!(groups[0].total, None);
    }

    #[test]
    fn date_groups_partition_the_input() {
        let records = vec![
            at("2025-03-01 09:00", "1,1"),
            at("2025-03-03 09:00", "x"),
            at("2025-03-03 10:00", "1,1"),
            at("2025-03-07 22:00", "1,1"),
        ];
        let groups = group_by_date(&records, Locale::EnUs);
        let total: u64 = groups.iter().map(|g| g.count).sum();
        assert_eq!(total, records.len() as u64);
        let mut dates: Vec<NaiveDate> = groups.iter().map(|g| g.date).collect();
        dates.dedup();
        assert_eq!(dates.len(), groups.len());
    }

    #[test]
    fn sums_values_per_date() {
        let records = vec![
            sale("2025-03-15 19:00", 30.0),
            sale("2025-03-15 20:00", 12.5),
            sale("2025-03-16 19:00", 8.0),
        ];
        let groups = group_by_date(&records, Locale::PtBr);
        assert_eq!(groups.len(), 2);
        assert!((groups[0].total.unwrap() - 42.5).abs() < f64::EPSILON);
        assert_eq!(groups[0].weekday_name, "Sábado");
        assert_eq!(groups[0].label, "2025-03-15 (Sábado)");
        assert_eq!(groups[1].label, "2025-03-16 (Domingo)");
    }

    #[test]
    fn records_without_value_count_but_do_not_sum() {
        let records = vec![sale("2025-03-15 19:00", 10.0), at("2025-03-15 19:30", "")];
        let groups = group_by_hour(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
        assert!((groups[0].total.unwrap() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn groups_by_hour_sparse_and_ordered() {
        let records = vec![
            at("2025-03-01 21:00", "1,1"),
            at("2025-03-01 17:10", "1,1"),
            at("2025-03-02 17:50", "1,1"),
        ];
        let groups = group_by_hour(&records);
        let summary: Vec<(u8, u64)> = groups.iter().map(|g| (g.hour, g.count)).collect();
        assert_eq!(summary, vec![(17, 2), (21, 1)]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let records: Vec<SalesRecord> = Vec::new();
        assert!(group_by_date(&records, Locale::EnUs).is_empty());
        assert!(group_by_hour(&records).is_empty());
    }

    #[test]
    fn zero_fill_covers_the_window() {
        let records = vec![at("2025-03-01 17:00", ""), at("2025-03-01 19:00", "")];
        let groups = group_by_hour(&records);
        let dense = zero_fill_hours(&groups, HourRange::new(16, 19).unwrap());
        let summary: Vec<(u8, u64)> = dense.iter().map(|g| (g.hour, g.count)).collect();
        assert_eq!(summary, vec![(16, 0), (17, 1), (18, 0), (19, 1)]);
    }
}
