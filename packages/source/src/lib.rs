#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Config-driven loading of point-of-sale datasets.
//!
//! Each dataset is described by a [`dataset_def::DatasetDefinition`]
//! (delimiter, encoding, column layout, timestamp formats) and read by the
//! single generic reader in [`reader`] into
//! [`sales_map_sales_models::SalesRecord`]s.

pub mod dataset_def;
pub mod parsing;
pub mod reader;
pub mod registry;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataset definition is malformed.
    #[error("Invalid dataset definition: {message}")]
    Definition {
        /// Description of what went wrong.
        message: String,
    },

    /// A named column is not present in the header row.
    #[error("Column '{column}' not found in header")]
    MissingColumn {
        /// The column name that was looked up.
        column: String,
    },
}
