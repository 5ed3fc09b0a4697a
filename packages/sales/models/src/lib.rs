#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-of-sale record types shared across the sales-map workspace.
//!
//! A [`SalesRecord`] is one parsed row of a source dataset. Its calendar
//! fields ([`DerivedFields`]) are computed once from the timestamp when the
//! record is constructed and are only readable afterwards, so every filter
//! and aggregation sees the same date, hour and weekday for a given row.

use chrono::{Datelike as _, NaiveDate, NaiveDateTime, Timelike as _, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Locale used for human-readable calendar names.
///
/// Weekday naming is a pure lookup on this value rather than a process-wide
/// locale setting.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Locale {
    /// English (United States).
    #[default]
    #[serde(rename = "en-US")]
    #[strum(serialize = "en-US")]
    EnUs,
    /// Portuguese (Brazil).
    #[serde(rename = "pt-BR")]
    #[strum(serialize = "pt-BR")]
    PtBr,
}

impl Locale {
    /// Returns the lowercase-as-written name of `weekday` in this locale.
    #[must_use]
    pub const fn weekday_name(self, weekday: Weekday) -> &'static str {
        match self {
            Self::EnUs => match weekday {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
            Self::PtBr => match weekday {
                Weekday::Mon => "segunda-feira",
                Weekday::Tue => "terça-feira",
                Weekday::Wed => "quarta-feira",
                Weekday::Thu => "quinta-feira",
                Weekday::Fri => "sexta-feira",
                Weekday::Sat => "sábado",
                Weekday::Sun => "domingo",
            },
        }
    }

    /// Returns the weekday name with its first letter uppercased, as shown
    /// in chart labels and summary tables.
    #[must_use]
    pub fn capitalized_weekday_name(self, weekday: Weekday) -> String {
        let name = self.weekday_name(weekday);
        let mut chars = name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

/// Calendar fields derived from a record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    /// Calendar date component.
    pub date: NaiveDate,
    /// Hour of day, 0-23. Naive local time, no timezone conversion.
    pub hour: u8,
    /// Day of week.
    pub weekday: Weekday,
}

impl DerivedFields {
    /// Derives the calendar fields of `timestamp`.
    #[must_use]
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        // `hour()` is always < 24
        #[allow(clippy::cast_possible_truncation)]
        let hour = timestamp.hour() as u8;
        Self {
            date: timestamp.date(),
            hour,
            weekday: timestamp.weekday(),
        }
    }
}

/// A latitude/longitude pair split out of a raw `"lat,lon"` location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl Coordinate {
    /// Separator between the latitude and longitude tokens.
    pub const SEPARATOR: char = ',';

    /// Parses a `"lat,lon"` string.
    ///
    /// Returns `None` unless the string splits into exactly two tokens that
    /// both parse as finite numbers. Whitespace around each token is
    /// ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split(Self::SEPARATOR);
        let lat = tokens.next()?;
        let lng = tokens.next()?;
        if tokens.next().is_some() {
            return None;
        }

        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lng.trim().parse::<f64>().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }

        Some(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the pair as `[lat, lon]`, the shape density maps expect.
    #[must_use]
    pub const fn to_pair(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// One parsed row of a sales or visit dataset.
///
/// Fields are private; the derived calendar fields are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    timestamp: NaiveDateTime,
    location: String,
    customer: Option<String>,
    value: Option<f64>,
    #[serde(flatten)]
    derived: DerivedFields,
}

impl SalesRecord {
    /// Builds a record and derives its calendar fields.
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        location: impl Into<String>,
        customer: Option<String>,
        value: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            location: location.into(),
            customer,
            value,
            derived: DerivedFields::from_timestamp(timestamp),
        }
    }

    /// When the sale or visit happened.
    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Raw `"lat,lon"` location string, possibly malformed.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Customer label, if the row had one.
    #[must_use]
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    /// Monetary amount, present only in the sales dataset.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// All derived calendar fields.
    #[must_use]
    pub const fn derived(&self) -> DerivedFields {
        self.derived
    }

    /// Calendar date of the timestamp.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.derived.date
    }

    /// Hour of day of the timestamp.
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.derived.hour
    }

    /// Day of week of the timestamp.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.derived.weekday
    }

    /// Splits the raw location into a [`Coordinate`].
    ///
    /// Computed on demand; a malformed location only affects callers that
    /// need coordinates.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::parse(&self.location)
    }
}
