#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Selection, aggregation and presentation types for sales reports.
//!
//! Selections describe what the user picked (dates and an hour window) and
//! validate themselves before any filtering happens. Aggregation and
//! presentation types are the immutable shapes a render pass hands to the
//! map, chart and table layers.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use sales_map_sales_models::{Coordinate, Locale};
use serde::Serialize;

// ── Selection errors ─────────────────────────────────────────────────────

/// A user selection that cannot be applied. The caller should re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A pair or range was given the wrong number of values.
    #[error("expected exactly {expected} dates, got {got}")]
    WrongValueCount {
        /// Number of values required.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A date range starts after it ends.
    #[error("date range start {start} is after end {end}")]
    RangeReversed {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// An hour outside 0-23.
    #[error("hour {hour} is outside 0-23")]
    HourOutOfDomain {
        /// The offending hour.
        hour: u8,
    },

    /// An hour window starts after it ends.
    #[error("hour range start {start} is after end {end}")]
    HourRangeReversed {
        /// Window start.
        start: u8,
        /// Window end.
        end: u8,
    },

    /// A selected date lies outside the dataset's observed dates.
    #[error("date {date} is outside the available range {min} to {max}")]
    OutOfBounds {
        /// The offending date.
        date: NaiveDate,
        /// Earliest observed date.
        min: NaiveDate,
        /// Latest observed date.
        max: NaiveDate,
    },
}

// ── Selections ───────────────────────────────────────────────────────────

/// Which dates to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DateSelection {
    /// No date constraint.
    #[default]
    All,
    /// Exactly one date.
    Single {
        /// The selected date.
        date: NaiveDate,
    },
    /// Exactly two dates, by membership. Dates between them are excluded.
    Pair {
        /// First selected date.
        first: NaiveDate,
        /// Second selected date.
        second: NaiveDate,
    },
    /// All dates from `start` to `end`, inclusive.
    Range {
        /// First date, inclusive.
        start: NaiveDate,
        /// Last date, inclusive.
        end: NaiveDate,
    },
}

impl DateSelection {
    /// A single date.
    #[must_use]
    pub const fn single(date: NaiveDate) -> Self {
        Self::Single { date }
    }

    /// An inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::RangeReversed`] if `start > end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, SelectionError> {
        let selection = Self::Range { start, end };
        selection.validate()?;
        Ok(selection)
    }

    /// An inclusive range from a list of picked values.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::WrongValueCount`] unless exactly two values
    /// are given, or [`SelectionError::RangeReversed`] if they are out of
    /// order.
    pub fn range_from_values(values: &[NaiveDate]) -> Result<Self, SelectionError> {
        let [start, end] = exactly_two(values)?;
        Self::range(start, end)
    }

    /// A date pair from a list of picked values.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::WrongValueCount`] unless exactly two values
    /// are given.
    pub fn pair_from_values(values: &[NaiveDate]) -> Result<Self, SelectionError> {
        let [first, second] = exactly_two(values)?;
        Ok(Self::Pair { first, second })
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::RangeReversed`] for a reversed range.
    pub fn validate(&self) -> Result<(), SelectionError> {
        match *self {
            Self::Range { start, end } if start > end => {
                Err(SelectionError::RangeReversed { start, end })
            }
            _ => Ok(()),
        }
    }

    /// Checks that every selected date lies within `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::OutOfBounds`] for the first date outside.
    pub fn validate_within(&self, bounds: &DateBounds) -> Result<(), SelectionError> {
        self.validate()?;
        let dates = match *self {
            Self::All => vec![],
            Self::Single { date } => vec![date],
            Self::Pair { first, second } => vec![first, second],
            Self::Range { start, end } => vec![start, end],
        };

        dates
            .into_iter()
            .find(|d| !bounds.contains(*d))
            .map_or(Ok(()), |date| {
                Err(SelectionError::OutOfBounds {
                    date,
                    min: bounds.min,
                    max: bounds.max,
                })
            })
    }

    /// Whether `date` is selected.
    #[must_use]
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            Self::All => true,
            Self::Single { date: selected } => date == selected,
            Self::Pair { first, second } => date == first || date == second,
            Self::Range { start, end } => start <= date && date <= end,
        }
    }

    /// Whether this selection names exactly one date.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self, Self::Single { .. })
    }
}

fn exactly_two(values: &[NaiveDate]) -> Result<[NaiveDate; 2], SelectionError> {
    <[NaiveDate; 2]>::try_from(values).map_err(|_| SelectionError::WrongValueCount {
        expected: 2,
        got: values.len(),
    })
}

/// Inclusive hour-of-day window.
///
/// Construct with [`HourRange::new`]; the bounds are always within 0-23 and
/// ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HourRange {
    start: u8,
    end: u8,
}

impl HourRange {
    /// Hours 0 through 23.
    pub const FULL_DAY: Self = Self { start: 0, end: 23 };

    /// Creates an inclusive window.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if either bound exceeds 23 or
    /// `start > end`.
    pub const fn new(start: u8, end: u8) -> Result<Self, SelectionError> {
        if start > 23 {
            return Err(SelectionError::HourOutOfDomain { hour: start });
        }
        if end > 23 {
            return Err(SelectionError::HourOutOfDomain { hour: end });
        }
        if start > end {
            return Err(SelectionError::HourRangeReversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// First hour, inclusive.
    #[must_use]
    pub const fn start(self) -> u8 {
        self.start
    }

    /// Last hour, inclusive.
    #[must_use]
    pub const fn end(self) -> u8 {
        self.end
    }

    /// Whether `hour` falls in the window.
    #[must_use]
    pub const fn contains(self, hour: u8) -> bool {
        self.start <= hour && hour <= self.end
    }

    /// Iterates every hour in the window.
    pub fn hours(self) -> impl Iterator<Item = u8> {
        self.start..=self.end
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

/// A complete user selection: dates plus an hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Date constraint.
    pub dates: DateSelection,
    /// Hour constraint.
    pub hours: HourRange,
}

// ── Observed bounds ──────────────────────────────────────────────────────

/// Earliest and latest date present in a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBounds {
    /// Earliest date.
    pub min: NaiveDate,
    /// Latest date.
    pub max: NaiveDate,
}

impl DateBounds {
    /// Whether `date` lies within the bounds, inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// The whole observed period as a range selection.
    #[must_use]
    pub const fn as_range(&self) -> DateSelection {
        DateSelection::Range {
            start: self.min,
            end: self.max,
        }
    }
}

/// Earliest and latest hour present in a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBounds {
    /// Earliest hour.
    pub min: u8,
    /// Latest hour.
    pub max: u8,
}

impl HourBounds {
    /// The observed hours as a window.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if the bounds are not a valid
    /// [`HourRange`].
    pub const fn as_range(&self) -> Result<HourRange, SelectionError> {
        HourRange::new(self.min, self.max)
    }
}

// ── Aggregates ───────────────────────────────────────────────────────────

/// Statistics for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup {
    /// The grouped date.
    pub date: NaiveDate,
    /// Day of week of `date`.
    pub weekday: Weekday,
    /// Capitalized weekday name in the report locale.
    pub weekday_name: String,
    /// Chart label, `"YYYY-MM-DD (Weekday)"`.
    pub label: String,
    /// Number of records on this date.
    pub count: u64,
    /// Sum of values. `None` when no record in the group carries a value.
    pub total: Option<f64>,
}

/// Statistics for one hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourGroup {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Number of records in this hour.
    pub count: u64,
    /// Sum of values. `None` when no record in the group carries a value.
    pub total: Option<f64>,
}

// ── Presentation shapes ──────────────────────────────────────────────────

/// A record placed on the map, with its popup text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    /// Marker position.
    pub coordinate: Coordinate,
    /// Timestamp of the record.
    pub timestamp: NaiveDateTime,
    /// Customer label, if any.
    pub customer: Option<String>,
    /// Hour of day of the record.
    pub hour: u8,
    /// Popup text (HTML line breaks).
    pub popup: String,
}

/// Everything a map layer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Mean position of all markers.
    pub center: Coordinate,
    /// One marker per mappable record.
    pub markers: Vec<MapMarker>,
    /// `[lat, lon]` pairs for density rendering.
    pub heat_points: Vec<[f64; 2]>,
    /// Filtered records left off the map because their location could not
    /// be split.
    pub unmapped: u64,
}

/// When a render pass includes the per-hour breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HourlyDetail {
    /// Always.
    #[default]
    Always,
    /// Only when the date selection names a single date.
    SingleDateOnly,
    /// Never.
    Never,
}

/// What a render pass should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOptions {
    /// Locale for weekday labels.
    pub locale: Locale,
    /// Whether to build the map view.
    pub include_map: bool,
    /// When to build the per-hour breakdown.
    pub hourly_detail: HourlyDetail,
}

/// Output of a render pass with at least one matching record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The selection that produced this report.
    pub selection: Selection,
    /// Number of records that matched the selection.
    pub record_count: u64,
    /// Map view. `None` when not requested or no record has coordinates.
    pub map: Option<MapView>,
    /// Per-date statistics, ascending by date.
    pub by_date: Vec<DateGroup>,
    /// Per-hour statistics, ascending by hour, when requested.
    pub by_hour: Option<Vec<HourGroup>>,
}

/// Result of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PassOutcome {
    /// The selection matched no records. Not an error.
    NoData {
        /// The selection that matched nothing.
        selection: Selection,
    },
    /// The selection matched records.
    Report(Report),
}
