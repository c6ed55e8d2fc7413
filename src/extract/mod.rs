//! Score extraction engine.
//!
//! Turns an uncooperative gradebook grid into one person's score:
//! locate the header row, pick the total column, find the person's row and
//! apply the source's [`Strategy`]. Everything here is pure and synchronous;
//! messy input degrades into a best-effort result or "not found", never an
//! error.

pub mod header;
pub mod matcher;
pub mod normalize;
pub mod number;
pub mod strategy;
pub mod total;

pub use header::find_header_row;
pub use matcher::{find_row, RowMatch};
pub use normalize::{normalize, normalize_name};
pub use number::{parse_number, MAX_ABS_VALUE};
pub use strategy::{round3, Score, Strategy};
pub use total::{classify_header, find_total_column, TotalColumn, TotalRank};

use serde::Serialize;
use tracing::debug;

/// One row of raw cells. Rows in a grid may differ in length.
pub type Row = Vec<String>;

/// A table of raw text cells as produced by a table fetcher.
pub type Grid = Vec<Row>;

/// Header position and total column detected in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout<'a> {
    pub header_index: usize,
    /// The header row's cells; empty when the grid has no rows.
    pub headers: &'a [String],
    pub total_column: Option<TotalColumn>,
}

impl<'a> SheetLayout<'a> {
    /// Detect the layout of `grid`.
    pub fn detect(grid: &'a [Row]) -> Self {
        let header_index = find_header_row(grid);
        let headers: &[String] = grid.get(header_index).map(Vec::as_slice).unwrap_or(&[]);
        let total_column = find_total_column(headers);
        Self {
            header_index,
            headers,
            total_column,
        }
    }
}

/// Outcome of extracting a matched person's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// `None` when the matched row holds no usable numeric data.
    pub score: Option<f64>,
    /// Values the score was computed from, in column order.
    pub contributing_values: Vec<f64>,
    pub row_index: usize,
    pub matched_row: Row,
    pub header_index: usize,
    pub total_column: Option<TotalColumn>,
    /// Other rows that matched the same name. The first match is always used.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_rows: Vec<usize>,
}

impl ExtractionResult {
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous_rows.is_empty()
    }
}

/// Extract `target`'s score from `grid`.
///
/// Returns `None` when no row below the header matches the target name.
pub fn extract_score(grid: &[Row], target: &str, strategy: Strategy) -> Option<ExtractionResult> {
    if grid.is_empty() {
        return None;
    }

    let layout = SheetLayout::detect(grid);
    debug!(
        header_index = layout.header_index,
        total_column = ?layout.total_column,
        "Detected sheet layout"
    );

    let matched = find_row(grid, layout.header_index, target)?;
    debug!(
        row_index = matched.index,
        also_matched = ?matched.also_matched,
        "Matched row for {}",
        target
    );

    let total_index = layout.total_column.map(|c| c.index);
    let score = strategy.apply(matched.row, layout.headers.len(), total_index);

    Some(ExtractionResult {
        score: score.value,
        contributing_values: score.contributing,
        row_index: matched.index,
        matched_row: matched.row.to_vec(),
        header_index: layout.header_index,
        total_column: layout.total_column,
        ambiguous_rows: matched.also_matched,
    })
}
