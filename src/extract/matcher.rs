//! Locating a person's row below the header.

use super::normalize::normalize_name;

/// A data row whose text contains the target name.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatch<'a> {
    /// Index of the row in the grid.
    pub index: usize,
    /// The row's raw cells.
    pub row: &'a [String],
    /// Indices of later rows that also contain the target name.
    pub also_matched: Vec<usize>,
}

impl RowMatch<'_> {
    pub fn is_ambiguous(&self) -> bool {
        !self.also_matched.is_empty()
    }
}

/// Find the first row after `header_index` containing `target`.
///
/// Both sides go through [`normalize_name`] and are compared by substring, so
/// "Иванов" matches "Иванов Пётр Сергеевич". A target that normalizes to
/// nothing never matches. Later matching rows are reported in
/// [`RowMatch::also_matched`] but never change which row is returned.
pub fn find_row<'a>(grid: &'a [Vec<String>], header_index: usize, target: &str) -> Option<RowMatch<'a>> {
    let needle = normalize_name(target);
    if needle.is_empty() {
        return None;
    }

    let mut hits = grid
        .iter()
        .enumerate()
        .skip(header_index + 1)
        .filter(|(_, row)| !row.is_empty())
        .filter(|(_, row)| normalize_name(&row.join(" ")).contains(&needle))
        .map(|(index, _)| index);

    let index = hits.next()?;
    Some(RowMatch {
        index,
        row: &grid[index],
        also_matched: hits.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_matches_full_name_row() {
        let g = grid(&[
            &["ФИО", "лр1"],
            &["Сидорова Анна", "4"],
            &["Иванов Пётр", "5"],
        ]);
        let m = find_row(&g, 0, "Иванов").unwrap();
        assert_eq!(m.index, 2);
        assert_eq!(m.row[1], "5");
        assert!(!m.is_ambiguous());
    }

    #[test]
    fn test_matches_across_cells_and_yo() {
        let g = grid(&[&["Фамилия", "Имя"], &["Королёв", "Сергей", "7"]]);
        let m = find_row(&g, 0, "королев сергей").unwrap();
        assert_eq!(m.index, 1);
    }

    #[test]
    fn test_header_and_rows_above_are_skipped() {
        let g = grid(&[&["Иванов"], &["ФИО"], &["Петров"]]);
        assert!(find_row(&g, 1, "Иванов").is_none());
    }

    #[test]
    fn test_short_fragment_matches_by_substring() {
        let g = grid(&[&["ФИО"], &["Иванов", "5"], &["Петров", "3"]]);
        let m = find_row(&g, 0, "ов").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.also_matched, vec![2]);
        assert!(m.is_ambiguous());
    }

    #[test]
    fn test_empty_target_never_matches() {
        let g = grid(&[&["ФИО"], &["Иванов", "5"]]);
        assert!(find_row(&g, 0, "").is_none());
        assert!(find_row(&g, 0, "  123 !").is_none());
        assert!(find_row(&g, 0, "Smith").is_none());
    }

    #[test]
    fn test_no_rows_after_header() {
        let g = grid(&[&["ФИО", "Итог"]]);
        assert!(find_row(&g, 0, "Иванов").is_none());
        assert!(find_row(&g, 5, "Иванов").is_none());
    }
}
