//! Config-driven dataset definition.
//!
//! [`DatasetDefinition`] captures everything that differs between the
//! point-of-sale exports: delimiter, text encoding, column layout,
//! timestamp formats and display defaults. A single generic reader
//! ([`crate::reader`]) handles every dataset.

use std::borrow::Cow;
use std::path::Path;

use sales_map_sales_models::Locale;
use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::SourceError;
use crate::parsing::DEFAULT_TIMESTAMP_FORMATS;

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete, config-driven dataset definition.
///
/// Built-in definitions are embedded at compile time (see
/// [`crate::registry`]); custom ones can be loaded from a TOML file with
/// [`load_dataset_toml`].
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"coordinates"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Default file name to read when no path is given.
    pub file: String,
    /// Field delimiter. Must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Character encoding of the file.
    #[serde(default)]
    pub encoding: TextEncoding,
    /// Whether the first line is a header. The header is never parsed as a
    /// record.
    #[serde(default = "default_true")]
    pub has_header: bool,
    /// Column layout.
    pub columns: ColumnMapping,
    /// `chrono` format strings tried in order when parsing timestamps.
    #[serde(default)]
    pub timestamp_formats: Vec<String>,
    /// Whether the value column uses a decimal comma (`"1.234,50"`).
    #[serde(default)]
    pub decimal_comma: bool,
    /// Hour window applied when the user does not pick one.
    #[serde(default)]
    pub default_hours: Option<HourWindow>,
    /// Locale for weekday labels.
    #[serde(default)]
    pub locale: Locale,
}

const fn default_delimiter() -> char {
    ','
}

const fn default_true() -> bool {
    true
}

impl DatasetDefinition {
    /// Returns the delimiter as the byte the CSV reader expects.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, SourceError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| SourceError::Definition {
                message: format!(
                    "{}: delimiter '{}' is not a single ASCII character",
                    self.id, self.delimiter
                ),
            })
    }

    /// Timestamp formats to try, falling back to the built-in list when the
    /// definition does not name any.
    #[must_use]
    pub fn timestamp_formats(&self) -> Vec<&str> {
        if self.timestamp_formats.is_empty() {
            DEFAULT_TIMESTAMP_FORMATS.to_vec()
        } else {
            self.timestamp_formats.iter().map(String::as_str).collect()
        }
    }
}

// ── Encoding ─────────────────────────────────────────────────────────────

/// Text encoding of a dataset file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TextEncoding {
    /// UTF-8. Invalid sequences are replaced with U+FFFD.
    #[default]
    Utf8,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Decodes one raw field.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes),
            Self::Latin1 => {
                if bytes.is_ascii() {
                    // ASCII is a subset of both encodings
                    String::from_utf8_lossy(bytes)
                } else {
                    Cow::Owned(bytes.iter().copied().map(char::from).collect())
                }
            }
        }
    }
}

// ── Column mapping ───────────────────────────────────────────────────────

/// Reference to a column, either by zero-based position or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// Zero-based column position.
    Index(usize),
    /// Header name (exact match after trimming).
    Name(String),
}

impl ColumnRef {
    /// Resolves this reference to a column position.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if a named column is not in
    /// `headers` (or the file has no header row).
    pub fn resolve(&self, headers: Option<&[String]>) -> Result<usize, SourceError> {
        match self {
            Self::Index(i) => Ok(*i),
            Self::Name(name) => headers
                .and_then(|h| h.iter().position(|header| header == name))
                .ok_or_else(|| SourceError::MissingColumn {
                    column: name.clone(),
                }),
        }
    }
}

/// Where each field lives in a row.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    /// Raw `"lat,lon"` location. `None` for datasets without coordinates.
    pub location: Option<ColumnRef>,
    /// Timestamp column.
    pub timestamp: ColumnRef,
    /// Optional customer label.
    pub customer: Option<ColumnRef>,
    /// Optional monetary value.
    pub value: Option<ColumnRef>,
}

/// Column mapping resolved against an actual header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// Location column position.
    pub location: Option<usize>,
    /// Timestamp column position.
    pub timestamp: usize,
    /// Customer column position.
    pub customer: Option<usize>,
    /// Value column position.
    pub value: Option<usize>,
}

impl ColumnMapping {
    /// Resolves every column reference.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if any named column is absent.
    pub fn resolve(&self, headers: Option<&[String]>) -> Result<ResolvedColumns, SourceError> {
        let optional = |col: Option<&ColumnRef>| col.map(|c| c.resolve(headers)).transpose();

        Ok(ResolvedColumns {
            location: optional(self.location.as_ref())?,
            timestamp: self.timestamp.resolve(headers)?,
            customer: optional(self.customer.as_ref())?,
            value: optional(self.value.as_ref())?,
        })
    }
}

// ── Display defaults ─────────────────────────────────────────────────────

/// Inclusive hour window from a dataset definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HourWindow {
    /// First hour, inclusive.
    pub start: u8,
    /// Last hour, inclusive.
    pub end: u8,
}

// ── Loading ──────────────────────────────────────────────────────────────

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Definition {
        message: e.to_string(),
    })
}

/// Reads and parses a [`DatasetDefinition`] from a TOML file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_dataset_toml(path: &Path) -> Result<DatasetDefinition, SourceError> {
    let contents = std::fs::read_to_string(path)?;
    let def = parse_dataset_toml(&contents)?;
    log::debug!("Loaded dataset definition '{}' from {}", def.id, path.display());
    Ok(def)
}
