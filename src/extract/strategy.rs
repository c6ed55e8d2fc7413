//! Score extraction strategies.
//!
//! Sources encode a final grade differently: some expose one authoritative
//! total cell, others only list per-assignment scores that must be summed,
//! and a sum has to stop before an existing total column so the total is not
//! counted against its own components.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::number::parse_number;

/// How a matched row is turned into one score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Last numeric cell of the row, scanning from the right.
    #[serde(alias = "take_last_total")]
    TakeLast,
    /// The total column's cell, or a sum when that cell is unusable.
    PreferTotal,
    /// Sum of numeric cells left of the total column.
    #[default]
    SumUntilTotal,
}

impl Strategy {
    /// Fold legacy per-source boolean flags into one strategy.
    ///
    /// `take_last_total` wins over `prefer_total`, which wins over
    /// `sum_until_total`; no flag at all means [`Strategy::SumUntilTotal`],
    /// so `sum_until_total` only ever restates the default.
    pub fn from_flags(prefer_total: bool, _sum_until_total: bool, take_last_total: bool) -> Self {
        match (take_last_total, prefer_total) {
            (true, _) => Strategy::TakeLast,
            (false, true) => Strategy::PreferTotal,
            (false, false) => Strategy::SumUntilTotal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::TakeLast => "take_last",
            Strategy::PreferTotal => "prefer_total",
            Strategy::SumUntilTotal => "sum_until_total",
        }
    }

    /// Compute a score from `row`.
    ///
    /// `header_len` is the length of the header row and bounds the sum when no
    /// total column was found; an empty header leaves the sum unbounded.
    pub fn apply(&self, row: &[String], header_len: usize, total_column: Option<usize>) -> Score {
        match self {
            Strategy::TakeLast => take_last(row),
            Strategy::PreferTotal => total_column
                .and_then(|idx| row.get(idx))
                .and_then(|cell| parse_number(cell))
                .map(Score::single)
                .unwrap_or_else(|| sum_until(row, header_len, total_column)),
            Strategy::SumUntilTotal => sum_until(row, header_len, total_column),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "take_last" | "take_last_total" | "last" => Ok(Strategy::TakeLast),
            "prefer_total" | "total" => Ok(Strategy::PreferTotal),
            "sum_until_total" | "sum" => Ok(Strategy::SumUntilTotal),
            other => Err(format!(
                "unknown strategy '{}' (expected take_last, prefer_total or sum_until_total)",
                other
            )),
        }
    }
}

/// A computed score and the cell values it was built from, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Score {
    /// `None` when the row holds no usable numeric cell.
    pub value: Option<f64>,
    pub contributing: Vec<f64>,
}

impl Score {
    fn single(value: f64) -> Self {
        Self {
            value: Some(value),
            contributing: vec![value],
        }
    }
}

fn take_last(row: &[String]) -> Score {
    row.iter()
        .rev()
        .find_map(|cell| parse_number(cell))
        .map(Score::single)
        .unwrap_or_default()
}

fn sum_until(row: &[String], header_len: usize, total_column: Option<usize>) -> Score {
    let stop = match total_column {
        Some(idx) => idx,
        None if header_len > 0 => header_len,
        None => usize::MAX,
    };
    let contributing: Vec<f64> = row
        .iter()
        .take(stop)
        .filter_map(|cell| parse_number(cell))
        .collect();

    if contributing.is_empty() {
        return Score::default();
    }
    Score {
        value: Some(round3(contributing.iter().sum())),
        contributing,
    }
}

/// Round to three decimal places, ties to even on the exact binary value.
pub fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}
