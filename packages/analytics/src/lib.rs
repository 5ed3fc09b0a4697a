#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering, aggregation and map projection for sales reports.
//!
//! Everything here works on borrowed [`sales_map_sales_models::SalesRecord`]
//! slices and returns new values; the loaded record set is never mutated.
//! [`report::render_pass`] ties the pieces together into one pass.

pub mod aggregate;
pub mod bounds;
pub mod filter;
pub mod projection;
pub mod report;

#[cfg(test)]
mod fixtures;

pub use report::render_pass;
