//! sheetscore - score extraction from loosely structured gradebook exports.
//!
//! Gradebooks exported from spreadsheets carry a few title rows, a header
//! row somewhere near the top, and one row per person. This crate finds the
//! header, locates a person's row by fuzzy name match and reduces the row to
//! a single score using a per-source strategy.

pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod sources;
