//! Double materiality rating aggregation.
//!
//! Submissions hold per-respondent ratings on two axes. The crate keeps them
//! in a store, derives the synthetic "Average" entry, groups everything per
//! respondent, and classifies points into the four quadrants of a matrix.

pub mod aggregate;
pub mod config;
pub mod context;
pub mod csv;
pub mod error;
pub mod grouped;
pub mod model;
pub mod quadrant;
pub mod report_helpers;
pub mod store;
pub mod transport;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};
