#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Command-line reports over point-of-sale datasets.
//!
//! Every report subcommand loads one dataset, turns its options into a
//! [`Selection`], runs a single render pass and prints the outcome as a
//! table, JSON, or `GeoJSON`.

mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sales_map_analytics::bounds::{date_bounds, hour_bounds};
use sales_map_analytics::render_pass;
use sales_map_analytics_models::{
    DateBounds, DateSelection, HourBounds, HourRange, HourlyDetail, PassOptions, PassOutcome,
    Selection, SelectionError,
};
use sales_map_sales_models::Locale;
use sales_map_source::dataset_def::{DatasetDefinition, load_dataset_toml};
use sales_map_source::reader::load_file;
use sales_map_source::registry::{all_datasets, find_dataset};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "sales_map_cli", about = "Sales and visit reports by date and hour")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in dataset definitions
    Datasets,
    /// Visits on a map, filtered by date
    Map(ReportArgs),
    /// Visits filtered by date and hour, with per-hour counts
    PeakHours(ReportArgs),
    /// Daily sales and profit, with hourly detail for a single date
    Profit(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Built-in dataset id (see `datasets`)
    #[arg(long, conflicts_with = "definition")]
    dataset: Option<String>,
    /// Path to a custom dataset definition TOML
    #[arg(long)]
    definition: Option<PathBuf>,
    /// Data file to read (overrides the definition's default file)
    #[arg(long)]
    file: Option<PathBuf>,
    /// Single date (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["dates", "from", "to"])]
    date: Option<NaiveDate>,
    /// Exactly two dates, comma-separated
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["from", "to"])]
    dates: Vec<NaiveDate>,
    /// Range start (defaults to the first observed date)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Range end (defaults to the last observed date)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Inclusive hour range, e.g. `16-23`, or a single hour
    #[arg(long)]
    hours: Option<String>,
    /// Emit density points instead of markers
    #[arg(long)]
    heatmap: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// The report a subcommand produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Map,
    PeakHours,
    Profit,
}

impl Page {
    const fn default_dataset(self) -> &'static str {
        match self {
            Self::Map | Self::PeakHours => "coordinates",
            Self::Profit => "sales",
        }
    }

    const fn options(self, locale: Locale) -> PassOptions {
        let (include_map, hourly_detail) = match self {
            Self::Map => (true, HourlyDetail::Never),
            Self::PeakHours => (true, HourlyDetail::Always),
            Self::Profit => (false, HourlyDetail::SingleDateOnly),
        };
        PassOptions {
            locale,
            include_map,
            hourly_detail,
        }
    }

    /// Whether the page narrows records by hour of day by default.
    const fn filters_hours(self) -> bool {
        matches!(self, Self::PeakHours | Self::Profit)
    }

    /// Date selection used when no date option is given.
    const fn default_dates(self, bounds: &DateBounds) -> DateSelection {
        match self {
            Self::Map => DateSelection::single(bounds.min),
            Self::PeakHours | Self::Profit => bounds.as_range(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Datasets => output::print_datasets(&all_datasets()),
        Commands::Map(args) => run_report(Page::Map, &args)?,
        Commands::PeakHours(args) => run_report(Page::PeakHours, &args)?,
        Commands::Profit(args) => run_report(Page::Profit, &args)?,
    }

    Ok(())
}

/// Loads the dataset, builds the selection and prints one render pass.
fn run_report(page: Page, args: &ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let def = resolve_definition(page, args)?;
    let path = args
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&def.file));
    let loaded = load_file(&path, &def)?;

    let Some(bounds) = date_bounds(&loaded.records) else {
        log::warn!(
            "[{}] No rows with a valid timestamp in {}",
            def.id,
            path.display()
        );
        let outcome = PassOutcome::NoData {
            selection: Selection::default(),
        };
        return output::print_outcome(
            &outcome,
            &loaded.stats,
            args.format,
            false,
            args.heatmap,
        );
    };

    let dates = date_selection(page, args, &bounds)?;
    dates.validate_within(&bounds)?;

    let hours = hour_range(
        page,
        args.hours.as_deref(),
        &def,
        hour_bounds(&loaded.records),
    )?;

    let selection = Selection { dates, hours };
    let options = page.options(def.locale);
    let outcome = render_pass(&loaded.records, &selection, &options)?;

    output::print_outcome(
        &outcome,
        &loaded.stats,
        args.format,
        options.include_map,
        args.heatmap,
    )
}

fn resolve_definition(
    page: Page,
    args: &ReportArgs,
) -> Result<DatasetDefinition, Box<dyn std::error::Error>> {
    if let Some(path) = &args.definition {
        return Ok(load_dataset_toml(path)?);
    }

    let id = args.dataset.as_deref().unwrap_or(page.default_dataset());
    find_dataset(id)
        .ok_or_else(|| format!("Unknown dataset '{id}' (run `datasets` to list them)").into())
}

/// Builds the date selection from `--date`, `--dates` or `--from`/`--to`,
/// falling back to the page default.
fn date_selection(
    page: Page,
    args: &ReportArgs,
    bounds: &DateBounds,
) -> Result<DateSelection, SelectionError> {
    if let Some(date) = args.date {
        return Ok(DateSelection::single(date));
    }
    if !args.dates.is_empty() {
        return DateSelection::pair_from_values(&args.dates);
    }
    if args.from.is_some() || args.to.is_some() {
        return DateSelection::range_from_values(&[
            args.from.unwrap_or(bounds.min),
            args.to.unwrap_or(bounds.max),
        ]);
    }
    Ok(page.default_dates(bounds))
}

/// Resolves the hour window: explicit `--hours`, then (pages that filter
/// by hour) the dataset default, then (peak hours only) the observed
/// hours, then the whole day.
fn hour_range(
    page: Page,
    hours: Option<&str>,
    def: &DatasetDefinition,
    observed: Option<HourBounds>,
) -> Result<HourRange, Box<dyn std::error::Error>> {
    if let Some(raw) = hours {
        return parse_hours(raw);
    }
    if !page.filters_hours() {
        return Ok(HourRange::FULL_DAY);
    }
    if let Some(window) = def.default_hours {
        return Ok(HourRange::new(window.start, window.end)?);
    }
    if page == Page::PeakHours
        && let Some(observed) = observed
    {
        return Ok(observed.as_range()?);
    }
    Ok(HourRange::FULL_DAY)
}

/// Parses `"16-23"` or `"19"`.
fn parse_hours(raw: &str) -> Result<HourRange, Box<dyn std::error::Error>> {
    let invalid = || format!("Invalid hour range '{raw}', expected START-END");

    let (start, end) = raw.split_once('-').unwrap_or((raw, raw));
    let start: u8 = start.trim().parse().map_err(|_| invalid())?;
    let end: u8 = end.trim().parse().map_err(|_| invalid())?;

    Ok(HourRange::new(start, end)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn bounds() -> DateBounds {
        DateBounds {
            min: d(1),
            max: d(10),
        }
    }

    fn report_args(argv: &[&str]) -> ReportArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Commands::Map(args) | Commands::PeakHours(args) | Commands::Profit(args) => args,
            Commands::Datasets => panic!("expected a report subcommand"),
        }
    }

    #[test]
    fn parses_hour_ranges() {
        let range = parse_hours("16-23").unwrap();
        assert_eq!((range.start(), range.end()), (16, 23));

        let single = parse_hours("19").unwrap();
        assert_eq!((single.start(), single.end()), (19, 19));

        assert!(parse_hours("23-16").is_err());
        assert!(parse_hours("0-24").is_err());
        assert!(parse_hours("evening").is_err());
    }

    #[test]
    fn single_date_option() {
        let args = report_args(&["sales_map_cli", "map", "--date", "2025-03-04"]);
        assert_eq!(
            date_selection(Page::Map, &args, &bounds()).unwrap(),
            DateSelection::single(d(4))
        );
    }

    #[test]
    fn two_dates_make_a_pair() {
        let args = report_args(&["sales_map_cli", "profit", "--dates", "2025-03-01,2025-03-03"]);
        assert_eq!(
            date_selection(Page::Profit, &args, &bounds()).unwrap(),
            DateSelection::Pair {
                first: d(1),
                second: d(3)
            }
        );
    }

    #[test]
    fn three_dates_are_rejected() {
        let args = report_args(&[
            "sales_map_cli",
            "profit",
            "--dates",
            "2025-03-01,2025-03-02,2025-03-03",
        ]);
        assert!(date_selection(Page::Profit, &args, &bounds()).is_err());
    }

    #[test]
    fn open_range_ends_default_to_bounds() {
        let args = report_args(&["sales_map_cli", "peak-hours", "--from", "2025-03-05"]);
        assert_eq!(
            date_selection(Page::PeakHours, &args, &bounds()).unwrap(),
            DateSelection::Range {
                start: d(5),
                end: d(10)
            }
        );
    }

    #[test]
    fn page_defaults() {
        let args = report_args(&["sales_map_cli", "map"]);
        assert_eq!(
            date_selection(Page::Map, &args, &bounds()).unwrap(),
            DateSelection::single(d(1))
        );
        assert_eq!(
            date_selection(Page::Profit, &args, &bounds()).unwrap(),
            bounds().as_range()
        );
    }

    #[test]
    fn format_option() {
        let default = report_args(&["sales_map_cli", "map"]);
        assert_eq!(default.format, OutputFormat::Table);

        let geojson = report_args(&["sales_map_cli", "map", "--format", "geojson"]);
        assert_eq!(geojson.format, OutputFormat::Geojson);

        assert!(Cli::try_parse_from(["sales_map_cli", "map", "--format", "xml"]).is_err());
    }

    #[test]
    fn date_and_range_conflict() {
        assert!(
            Cli::try_parse_from([
                "sales_map_cli",
                "map",
                "--date",
                "2025-03-01",
                "--from",
                "2025-03-02"
            ])
            .is_err()
        );
    }

    #[test]
    fn hour_defaults() {
        let sales = find_dataset("sales").unwrap();
        let coordinates = find_dataset("coordinates").unwrap();
        let observed = Some(HourBounds { min: 9, max: 21 });

        let evening = hour_range(Page::Profit, None, &sales, observed).unwrap();
        assert_eq!((evening.start(), evening.end()), (16, 23));

        let peak = hour_range(Page::PeakHours, None, &coordinates, observed).unwrap();
        assert_eq!((peak.start(), peak.end()), (9, 21));

        let map = hour_range(Page::Map, None, &coordinates, observed).unwrap();
        assert_eq!(map, HourRange::FULL_DAY);

        let map_of_sales = hour_range(Page::Map, None, &sales, observed).unwrap();
        assert_eq!(map_of_sales, HourRange::FULL_DAY);

        let reversed = Some(HourBounds { min: 21, max: 9 });
        assert!(hour_range(Page::PeakHours, None, &coordinates, reversed).is_err());

        let explicit = hour_range(Page::Profit, Some("18-20"), &sales, observed).unwrap();
        assert_eq!((explicit.start(), explicit.end()), (18, 20));
    }

    #[test]
    fn pages_request_their_outputs() {
        let map = Page::Map.options(Locale::PtBr);
        assert!(map.include_map);
        assert_eq!(map.hourly_detail, HourlyDetail::Never);

        let profit = Page::Profit.options(Locale::PtBr);
        assert!(!profit.include_map);
        assert_eq!(profit.hourly_detail, HourlyDetail::SingleDateOnly);

        assert_eq!(Page::Profit.default_dataset(), "sales");
        assert_eq!(Page::PeakHours.default_dataset(), "coordinates");
    }
}
