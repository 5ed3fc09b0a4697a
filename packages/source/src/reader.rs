//! Generic CSV reader driven by a [`DatasetDefinition`].
//!
//! Rows are read as raw bytes and each field is decoded with the dataset's
//! [`TextEncoding`](crate::dataset_def::TextEncoding), so single-byte
//! exports and UTF-8 exports share one code path. Rows without a parseable
//! timestamp are dropped and counted in [`LoadStats`]; they are expected
//! data-quality noise, not errors.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sales_map_sales_models::SalesRecord;
use serde::Serialize;

use crate::SourceError;
use crate::dataset_def::{DatasetDefinition, ResolvedColumns};
use crate::parsing::{non_empty, parse_timestamp, parse_value};

/// Counters collected while loading a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Data rows read (header excluded).
    pub rows_read: u64,
    /// Rows turned into records.
    pub records_kept: u64,
    /// Rows dropped because the timestamp was missing or unparseable.
    pub dropped_bad_timestamp: u64,
    /// Rows dropped because the CSV reader could not split them.
    pub dropped_malformed: u64,
}

/// Records loaded from one dataset plus loading statistics.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Parsed records in file order.
    pub records: Vec<SalesRecord>,
    /// Loading statistics.
    pub stats: LoadStats,
}

/// Reads all records from a file on disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or read, or if the
/// dataset definition does not match the file's header.
pub fn load_file(path: &Path, def: &DatasetDefinition) -> Result<LoadedDataset, SourceError> {
    log::info!("[{}] Reading {}", def.id, path.display());
    let file = File::open(path)?;
    read_records(BufReader::new(file), def)
}

/// Reads all records from any byte source.
///
/// # Errors
///
/// Returns [`SourceError`] on I/O failure, an invalid delimiter, or a named
/// column missing from the header row.
pub fn read_records<R: Read>(
    input: R,
    def: &DatasetDefinition,
) -> Result<LoadedDataset, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(def.delimiter_byte()?)
        .has_headers(def.has_header)
        .flexible(true)
        .from_reader(input);

    let headers: Option<Vec<String>> = if def.has_header {
        Some(
            reader
                .byte_headers()?
                .iter()
                .map(|h| def.encoding.decode(h).trim().to_owned())
                .collect(),
        )
    } else {
        None
    };

    let columns = def.columns.resolve(headers.as_deref())?;
    let formats = def.timestamp_formats();

    let mut records = Vec::new();
    let mut stats = LoadStats::default();

    for result in reader.byte_records() {
        stats.rows_read += 1;

        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::debug!("[{}] Skipping malformed row: {e}", def.id);
                stats.dropped_malformed += 1;
                continue;
            }
        };

        match parse_row(&row, columns, &formats, def) {
            Some(record) => {
                records.push(record);
                stats.records_kept += 1;
            }
            None => {
                log::debug!(
                    "[{}] Dropping row {} with unparseable timestamp",
                    def.id,
                    stats.rows_read
                );
                stats.dropped_bad_timestamp += 1;
            }
        }
    }

    log::info!(
        "[{}] Loaded {} of {} rows ({} bad timestamps, {} malformed)",
        def.id,
        stats.records_kept,
        stats.rows_read,
        stats.dropped_bad_timestamp,
        stats.dropped_malformed
    );

    Ok(LoadedDataset { records, stats })
}

/// Turns one raw row into a record. Returns `None` only when the timestamp
/// cannot be parsed; every other field is optional.
fn parse_row(
    row: &csv::ByteRecord,
    columns: ResolvedColumns,
    formats: &[&str],
    def: &DatasetDefinition,
) -> Option<SalesRecord> {
    let field = |idx: Option<usize>| {
        idx.and_then(|i| row.get(i))
            .map(|bytes| def.encoding.decode(bytes))
    };

    let timestamp = parse_timestamp(&field(Some(columns.timestamp))?, formats)?;
    let location = field(columns.location)
        .map(|s| s.trim().to_owned())
        .unwrap_or_default();
    let customer = field(columns.customer).and_then(|s| non_empty(&s));
    let value = field(columns.value).and_then(|s| parse_value(&s, def.decimal_comma));

    Some(SalesRecord::new(timestamp, location, customer, value))
}
