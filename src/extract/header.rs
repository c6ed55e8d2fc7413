//! Header row detection.
//!
//! Gradebook exports often open with a title, a group name or a few blank
//! rows, so the header is located by vocabulary rather than position.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::normalize;

/// Only this many leading rows are checked for header markers.
pub const HEADER_SCAN_LIMIT: usize = 10;

/// Markers that identify the person column when found in the first cell.
const IDENTITY_MARKERS: &[&str] = &["фио", "студент", "фамилия"];

/// Markers that identify an aggregate score column anywhere in the row.
const TOTAL_MARKERS: &[&str] = &["итог", "total"];

/// Lab work columns: "лр1", "лр 2", ...
static LAB_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bлр\s*\d").unwrap());

/// Find the index of the header row.
///
/// Returns the first of the leading [`HEADER_SCAN_LIMIT`] rows that carries an
/// identity, total or lab marker. Otherwise falls back to the first row with
/// any non-blank cell, and to `0` for a grid of blank rows.
pub fn find_header_row(grid: &[Vec<String>]) -> usize {
    grid.iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|row| is_header_like(row))
        .or_else(|| {
            grid.iter()
                .position(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        })
        .unwrap_or(0)
}

fn is_header_like(row: &[String]) -> bool {
    let cells: Vec<String> = row.iter().map(|c| normalize(c)).collect();

    let first = cells.first().map(String::as_str).unwrap_or("");
    if IDENTITY_MARKERS.iter().any(|m| first.contains(m)) {
        return true;
    }

    if cells
        .iter()
        .any(|c| TOTAL_MARKERS.iter().any(|m| c.contains(m)))
    {
        return true;
    }

    cells.iter().any(|c| LAB_MARKER.is_match(c))
}
