//! Numeric cell parsing.

/// Magnitude at or above which a parsed cell is treated as junk.
///
/// Gradebook exports occasionally carry student IDs or serialized dates in
/// score columns; no real score comes close to this bound.
pub const MAX_ABS_VALUE: f64 = 100_000.0;

/// Parse a raw cell into a score value.
///
/// Accepts a decimal comma. Returns `None` for empty cells, anything that is
/// not a number, non-finite values, and values whose magnitude reaches
/// [`MAX_ABS_VALUE`].
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() || value.abs() >= MAX_ABS_VALUE {
        return None;
    }
    Some(value)
}
