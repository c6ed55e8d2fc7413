//! Total column selection.
//!
//! Sheets frequently carry several "итог"-like columns: per-module subtotals
//! next to a grand total. Header labels are ranked by how specifically they
//! name a total, and among the best-ranked labels the rightmost one wins.

use std::cmp::Reverse;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::normalize::normalize;

/// How specifically a header label names a total score. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalRank {
    /// "итог", "total" or "итог (...)".
    Exact = 1,
    /// A qualified total such as "итог семестр".
    Qualified = 2,
    /// Any other label that mentions a total.
    Loose = 3,
}

impl TotalRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalRank::Exact => "exact",
            TotalRank::Qualified => "qualified",
            TotalRank::Loose => "loose",
        }
    }
}

impl fmt::Display for TotalRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen total column and the rank that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalColumn {
    pub index: usize,
    pub rank: TotalRank,
}

enum Rule {
    Exact(&'static str),
    Pattern(Regex),
    Prefix(&'static str),
    Contains(&'static str),
}

impl Rule {
    fn matches(&self, label: &str) -> bool {
        match self {
            Rule::Exact(s) => label == *s,
            Rule::Pattern(re) => re.is_match(label),
            Rule::Prefix(s) => label.starts_with(s),
            Rule::Contains(s) => label.contains(s),
        }
    }
}

/// Classification rules, checked in order. New header vocabularies go here.
static RULES: LazyLock<Vec<(TotalRank, Rule)>> = LazyLock::new(|| {
    vec![
        (TotalRank::Exact, Rule::Exact("итог")),
        (TotalRank::Exact, Rule::Exact("total")),
        (
            TotalRank::Exact,
            Rule::Pattern(Regex::new(r"^итог\s*\([^)]*\)$").unwrap()),
        ),
        (TotalRank::Qualified, Rule::Prefix("итог ")),
        (TotalRank::Qualified, Rule::Prefix("total ")),
        (TotalRank::Loose, Rule::Contains("итог")),
        (TotalRank::Loose, Rule::Contains("total")),
    ]
});

/// Rank a single raw header cell, or `None` if it does not name a total.
pub fn classify_header(cell: &str) -> Option<TotalRank> {
    let label = normalize(cell);
    if label.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|(_, rule)| rule.matches(&label))
        .map(|(rank, _)| *rank)
}

/// Pick the total column from a header row.
///
/// Keeps only the best rank present and returns the rightmost column at that
/// rank. The returned index always lies within `headers`.
pub fn find_total_column(headers: &[String]) -> Option<TotalColumn> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| classify_header(cell).map(|rank| TotalColumn { index, rank }))
        .max_by_key(|col| (Reverse(col.rank), col.index))
}
