//! Text canonicalization for header and name comparison.
//!
//! Gradebook exports differ in spacing, case, compatibility characters and the
//! ё/е spelling, none of which matter when comparing a header label or a
//! surname. Both normalizers are total: any input, including the empty
//! string, produces a value.

use unicode_normalization::UnicodeNormalization;

/// Canonical form of a cell or a joined row.
///
/// Applies NFKC composition, turns non-breaking spaces into plain spaces,
/// lower-cases, recomposes and collapses whitespace. Lower-casing can emit
/// combining marks (`İ` becomes `i` + U+0307), so the second NFKC pass keeps
/// the output a fixed point of this function.
pub fn normalize(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    let lowered = composed.replace('\u{a0}', " ").to_lowercase();
    let recomposed: String = lowered.nfkc().collect();
    collapse_whitespace(&recomposed)
}

/// Stricter form used only for matching people by name.
///
/// On top of [`normalize`], folds `ё` into `е` and drops every character that
/// is not a lower-case Cyrillic letter or a space.
pub fn normalize_name(text: &str) -> String {
    let kept: String = normalize(text)
        .chars()
        .map(|c| if c == 'ё' { 'е' } else { c })
        .filter(|c| ('а'..='я').contains(c) || *c == ' ')
        .collect();
    collapse_whitespace(&kept)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
