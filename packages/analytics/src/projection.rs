//! Coordinate projection for map output.
//!
//! Splitting a record's location is a read-only projection: records whose
//! location cannot be split are left off the map, but stay in whatever set
//! the caller uses for aggregation.

use sales_map_analytics_models::{MapMarker, MapView};
use sales_map_sales_models::{Coordinate, SalesRecord};

/// Pairs every record that has a valid coordinate with that coordinate.
pub fn mappable<'a, I>(records: I) -> Vec<(&'a SalesRecord, Coordinate)>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .filter_map(|r| r.coordinate().map(|c| (r, c)))
        .collect()
}

/// Popup text for a map marker.
#[must_use]
pub fn popup_text(record: &SalesRecord) -> String {
    format!(
        "Date/Time: {}<br>Customer: {}<br>Hour: {}",
        record.timestamp(),
        record.customer().unwrap_or("n/a"),
        record.hour()
    )
}

/// Mean position of `coords`, or `None` if empty.
#[must_use]
pub fn center(coords: &[Coordinate]) -> Option<Coordinate> {
    if coords.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = coords.len() as f64;
    let (lat_sum, lng_sum) = coords
        .iter()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.latitude, lng + c.longitude));

    Some(Coordinate {
        latitude: lat_sum / n,
        longitude: lng_sum / n,
    })
}

/// Builds the map view for `records`.
///
/// Returns `None` when no record has a usable coordinate.
pub fn map_view<'a, I>(records: I) -> Option<MapView>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let records: Vec<&SalesRecord> = records.into_iter().collect();
    let points = mappable(records.iter().copied());
    let unmapped = (records.len() - points.len()) as u64;

    if unmapped > 0 {
        log::debug!("{unmapped} records left off the map (unparseable location)");
    }

    let coords: Vec<Coordinate> = points.iter().map(|(_, c)| *c).collect();
    let mean = center(&coords)?;

    let markers = points
        .iter()
        .map(|(record, coordinate)| MapMarker {
            coordinate: *coordinate,
            timestamp: record.timestamp(),
            customer: record.customer().map(str::to_owned),
            hour: record.hour(),
            popup: popup_text(record),
        })
        .collect();

    Some(MapView {
        center: mean,
        markers,
        heat_points: coords.iter().map(|c| c.to_pair()).collect(),
        unmapped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::group_by_hour;
    use crate::fixtures::at;

    #[test]
    fn splits_valid_locations() {
        let records = vec![at("2025-03-01 10:00", "12.34,56.78")];
        let points = mappable(&records);
        assert_eq!(points.len(), 1);
        assert!((points[0].1.latitude - 12.34).abs() < f64::EPSILON);
        assert!((points[0].1.longitude - 56.78).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_location_leaves_map_but_not_hourly_input() {
        let records = vec![
            at("2025-03-01 10:00", "12.34,56.78"),
            at("2025-03-01 10:30", "12.34"),
        ];

        let view = map_view(&records).unwrap();
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.unmapped, 1);

        let hourly = group_by_hour(&records);
        assert_eq!(hourly.len(), 1);
        assert_eq!(hourly[0].count, 2);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn no_coordinates_means_no_map() {
        let records = vec![at("2025-03-01 10:00", ""), at("2025-03-01 11:00", "a,b")];
        assert!(map_view(&records).is_none());
    }

    #[test]
    fn center_is_the_mean() {
        let coords = [
            Coordinate {
                latitude: 10.0,
                longitude: 20.0,
            },
            Coordinate {
                latitude: 20.0,
                longitude: 40.0,
            },
        ];
        let c = center(&coords).unwrap();
        assert!((c.latitude - 15.0).abs() < f64::EPSILON);
        assert!((c.longitude - 30.0).abs() < f64::EPSILON);
        assert!(center(&[]).is_none());
    }

    #[test]
    fn heat_points_are_lat_lon_pairs() {
        let records = vec![at("2025-03-01 10:00", "1.5,-2.5")];
        let view = map_view(&records).unwrap();
        assert_eq!(view.heat_points, vec![[1.5, -2.5]]);
    }

    #[test]
    fn popup_mentions_customer_and_hour() {
        let record = at("2025-03-01 18:05", "1,1");
        assert_eq!(
            popup_text(&record),
            "Date/Time: 2025-03-01 18:05:00<br>Customer: n/a<br>Hour: 18"
        );
    }
}
