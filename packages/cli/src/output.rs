//! Printing of dataset listings and render-pass outcomes.

use std::fmt::Write as _;

use clap::ValueEnum;
use sales_map_analytics::aggregate::zero_fill_hours;
use sales_map_analytics_models::{DateGroup, HourGroup, MapMarker, MapView, PassOutcome, Report};
use sales_map_source::dataset_def::DatasetDefinition;
use sales_map_source::reader::LoadStats;
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display};

/// Width of the longest bar in the hourly chart.
const BAR_WIDTH: u64 = 40;

/// How a report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable tables.
    Table,
    /// The full outcome plus load statistics as JSON.
    Json,
    /// Map points as a `GeoJSON` `FeatureCollection`.
    Geojson,
}

/// Prints the built-in dataset definitions.
pub fn print_datasets(defs: &[DatasetDefinition]) {
    println!(
        "{:<14}{:<32}{:<11}{:<10}FILE",
        "ID", "NAME", "DELIMITER", "ENCODING"
    );
    for def in defs {
        println!(
            "{:<14}{:<32}{:<11}{:<10}{}",
            def.id,
            def.name,
            format!("'{}'", def.delimiter),
            def.encoding.as_ref(),
            def.file
        );
    }
}

/// Prints `outcome` in the requested format. `map_requested` says whether
/// the page asked for a map, so a missing one can be reported.
///
/// # Errors
///
/// Returns an error if the outcome cannot be serialized.
pub fn print_outcome(
    outcome: &PassOutcome,
    stats: &LoadStats,
    format: OutputFormat,
    map_requested: bool,
    heatmap: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if map_requested && is_unmappable(outcome) {
        log::warn!("None of the matched records has a valid location");
    }

    match format {
        OutputFormat::Table => print!(
            "{}",
            render_table(outcome, stats, map_requested, heatmap)?
        ),
        OutputFormat::Json => {
            let doc = json!({ "stats": stats, "outcome": outcome });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Geojson => {
            println!(
                "{}",
                serde_json::to_string_pretty(&feature_collection(outcome, heatmap))?
            );
        }
    }
    Ok(())
}

/// Whether records matched but none of them could be placed on the map.
const fn is_unmappable(outcome: &PassOutcome) -> bool {
    matches!(outcome, PassOutcome::Report(Report { map: None, .. }))
}

/// Builds a `FeatureCollection` of the outcome's map points. Empty when
/// there is no map.
fn feature_collection(outcome: &PassOutcome, heatmap: bool) -> Value {
    let features: Vec<Value> = match outcome {
        PassOutcome::Report(Report { map: Some(map), .. }) => {
            if heatmap {
                map.heat_points
                    .iter()
                    .map(|&[lat, lng]| point_feature(lat, lng, json!({})))
                    .collect()
            } else {
                map.markers.iter().map(marker_feature).collect()
            }
        }
        _ => Vec::new(),
    };

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn marker_feature(marker: &MapMarker) -> Value {
    point_feature(
        marker.coordinate.latitude,
        marker.coordinate.longitude,
        json!({
            "timestamp": marker.timestamp.to_string(),
            "customer": marker.customer,
            "hour": marker.hour,
            "popup": marker.popup,
        }),
    )
}

fn point_feature(lat: f64, lng: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [lng, lat]
        },
        "properties": properties,
    })
}

fn render_table(
    outcome: &PassOutcome,
    stats: &LoadStats,
    map_requested: bool,
    heatmap: bool,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(
        out,
        "Loaded {} of {} rows ({} without a valid timestamp, {} malformed)",
        stats.records_kept, stats.rows_read, stats.dropped_bad_timestamp, stats.dropped_malformed
    )?;

    let report = match outcome {
        PassOutcome::NoData { .. } => {
            writeln!(out, "No data available for the selected filters.")?;
            return Ok(out);
        }
        PassOutcome::Report(report) => report,
    };

    writeln!(out, "{} records matched", report.record_count)?;

    match &report.map {
        Some(map) => write_map(&mut out, map, heatmap)?,
        None if map_requested => writeln!(
            out,
            "\nNo mappable points: none of the matched records has a valid location."
        )?,
        None => {}
    }

    writeln!(out)?;
    write_dates(&mut out, &report.by_date)?;

    if let Some(by_hour) = &report.by_hour {
        writeln!(out)?;
        write_hours(&mut out, &zero_fill_hours(by_hour, report.selection.hours))?;
    }

    Ok(out)
}

fn write_map(out: &mut String, map: &MapView, heatmap: bool) -> std::fmt::Result {
    writeln!(
        out,
        "\nMap center {:.6},{:.6} ({} points, {} without coordinates)",
        map.center.latitude,
        map.center.longitude,
        map.markers.len(),
        map.unmapped
    )?;

    if heatmap {
        for [lat, lng] in &map.heat_points {
            writeln!(out, "  {lat:.6},{lng:.6}")?;
        }
    } else {
        for marker in &map.markers {
            writeln!(
                out,
                "  {}  {:.6},{:.6}  {}",
                marker.timestamp,
                marker.coordinate.latitude,
                marker.coordinate.longitude,
                marker.customer.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}

fn write_dates(out: &mut String, groups: &[DateGroup]) -> std::fmt::Result {
    writeln!(out, "{:<12}{:<16}{:>8}{:>12}", "DATE", "WEEKDAY", "COUNT", "TOTAL")?;
    for group in groups {
        writeln!(
            out,
            "{:<12}{:<16}{:>8}{:>12}",
            group.date.to_string(),
            group.weekday_name,
            group.count,
            format_total(group.total)
        )?;
    }
    Ok(())
}

fn write_hours(out: &mut String, groups: &[HourGroup]) -> std::fmt::Result {
    let max = groups.iter().map(|g| g.count).max().unwrap_or(0).max(1);

    writeln!(out, "{:<6}{:>8}{:>12}", "HOUR", "COUNT", "TOTAL")?;
    for group in groups {
        let width = usize::try_from(group.count * BAR_WIDTH / max).unwrap_or(0);
        writeln!(
            out,
            "{:<6}{:>8}{:>12}  {}",
            format!("{:02}h", group.hour),
            group.count,
            format_total(group.total),
            "#".repeat(width)
        )?;
    }
    Ok(())
}

fn format_total(total: Option<f64>) -> String {
    total.map_or_else(|| "-".to_string(), |t| format!("{t:.2}"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use sales_map_analytics::render_pass;
    use sales_map_analytics_models::{
        DateSelection, HourRange, HourlyDetail, PassOptions, Selection,
    };
    use sales_map_sales_models::{Locale, SalesRecord};

    use super::*;

    fn record(ts: &str, location: &str, value: Option<f64>) -> SalesRecord {
        let ts = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap();
        SalesRecord::new(ts, location, Some("Ana".to_string()), value)
    }

    fn outcome() -> PassOutcome {
        let records = vec![
            record("2025-03-15 19:00", "-23.5,-46.6", Some(20.0)),
            record("2025-03-15 21:00", "broken", Some(12.5)),
        ];
        let options = PassOptions {
            locale: Locale::PtBr,
            include_map: true,
            hourly_detail: HourlyDetail::Always,
        };
        let selection = Selection {
            dates: DateSelection::default(),
            hours: HourRange::new(18, 22).unwrap(),
        };
        render_pass(&records, &selection, &options).unwrap()
    }

    #[test]
    fn parses_formats() {
        assert_eq!(
            OutputFormat::from_str("geojson", false).unwrap(),
            OutputFormat::Geojson
        );
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert!(OutputFormat::from_str("xml", false).is_err());
    }

    #[test]
    fn markers_become_point_features() {
        let collection = feature_collection(&outcome(), false);
        assert_eq!(collection["type"], "FeatureCollection");

        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([-46.6, -23.5]));
        assert_eq!(features[0]["properties"]["hour"], 19);
        assert_eq!(features[0]["properties"]["customer"], "Ana");
    }

    #[test]
    fn heat_points_have_no_properties() {
        let collection = feature_collection(&outcome(), true);
        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"], json!({}));
    }

    #[test]
    fn no_data_is_an_empty_collection() {
        let no_data = PassOutcome::NoData {
            selection: Selection::default(),
        };
        let collection = feature_collection(&no_data, false);
        assert!(collection["features"].as_array().unwrap().is_empty());

        let table = render_table(&no_data, &LoadStats::default(), true, false).unwrap();
        assert!(table.contains("No data available"));
    }

    #[test]
    fn table_lists_dates_and_zero_filled_hours() {
        let table = render_table(&outcome(), &LoadStats::default(), true, false).unwrap();
        assert!(table.contains("2 records matched"));
        assert!(table.contains("1 without coordinates"));
        assert!(table.contains("Sábado"));
        assert!(table.contains("32.50"));
        // 18h through 22h, with 18h, 20h and 22h empty
        assert_eq!(table.lines().filter(|l| l.ends_with("-  ")).count(), 3);
    }

    #[test]
    fn reports_when_no_record_can_be_mapped() {
        let records = vec![
            record("2025-03-15 19:00", "broken", None),
            record("2025-03-15 20:00", "12.34", None),
        ];
        let options = PassOptions {
            locale: Locale::EnUs,
            include_map: true,
            hourly_detail: HourlyDetail::Never,
        };
        let outcome = render_pass(&records, &Selection::default(), &options).unwrap();
        assert!(is_unmappable(&outcome));

        let table = render_table(&outcome, &LoadStats::default(), true, false).unwrap();
        assert!(table.contains("2 records matched"));
        assert!(table.contains("No mappable points"));

        let without_map = render_table(&outcome, &LoadStats::default(), false, false).unwrap();
        assert!(!without_map.contains("No mappable points"));

        let collection = feature_collection(&outcome, false);
        assert!(collection["features"].as_array().unwrap().is_empty());
    }
}
