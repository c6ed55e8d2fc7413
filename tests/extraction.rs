//! End-to-end extraction behavior through the public API.

use sheetscore::extract::{
    extract_score, find_header_row, find_total_column, normalize, parse_number, Grid, Strategy,
};
use sheetscore::fetch::parse_csv;

fn grid(rows: &[&[&str]]) -> Grid {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn gradebook() -> Grid {
    grid(&[
        &["Ведомость группы ИС-21"],
        &[""],
        &["ФИО", "лр1", "лр2", "Итог", "комментарий"],
        &["Иванов Пётр Сергеевич", "5", "7", "12", "ok"],
        &["Сидорова Анна", "4,5", "", "4.5", ""],
    ])
}

#[test]
fn test_normalize_idempotent() {
    for s in ["  Иванов\u{a0}ПЁТР ", "ＬＲ１", "Итог (мод.1)", "", "\t\n"] {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
    }
}

#[test]
fn test_number_bounds() {
    assert_eq!(parse_number("99999.999"), Some(99999.999));
    assert_eq!(parse_number("100000"), None);
    assert_eq!(parse_number("-100000"), None);
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("3,5"), Some(3.5));
}

#[test]
fn test_header_falls_back_to_first_non_empty_row() {
    let g = grid(&[&["", " "], &["Группа ИС-21", ""], &["Иванов", "5"]]);
    assert_eq!(find_header_row(&g), 1);
}

#[test]
fn test_total_column_prefers_rightmost_best_rank() {
    let headers: Vec<String> = ["Итог", "ИТОГ (мод.1)", "лаба1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(find_total_column(&headers).map(|c| c.index), Some(1));
}

#[test]
fn test_sum_until_total() {
    let result = extract_score(&gradebook(), "Иванов", Strategy::SumUntilTotal).unwrap();
    assert_eq!(result.header_index, 2);
    assert_eq!(result.row_index, 3);
    assert_eq!(result.score, Some(12.0));
    assert_eq!(result.contributing_values, vec![5.0, 7.0]);
}

#[test]
fn test_prefer_total_reads_total_cell() {
    let result = extract_score(&gradebook(), "Иванов", Strategy::PreferTotal).unwrap();
    assert_eq!(result.score, Some(12.0));
    assert_eq!(result.contributing_values, vec![12.0]);
}

#[test]
fn test_take_last_scans_from_the_end() {
    let g = grid(&[&["ФИО", "лр1", "лр2", "Итог"], &["Иванов", "", "", "88.5"]]);
    let result = extract_score(&g, "Иванов", Strategy::TakeLast).unwrap();
    assert_eq!(result.score, Some(88.5));
}

#[test]
fn test_row_matching_by_substring() {
    let result = extract_score(&gradebook(), "иванов петр", Strategy::SumUntilTotal).unwrap();
    assert_eq!(result.row_index, 3);

    // Short fragments still match by containment; later matches are reported.
    let result = extract_score(&gradebook(), "ов", Strategy::SumUntilTotal).unwrap();
    assert_eq!(result.row_index, 3);
    assert_eq!(result.ambiguous_rows, vec![4]);
}

#[test]
fn test_unknown_person_is_not_found() {
    assert!(extract_score(&gradebook(), "Петров", Strategy::SumUntilTotal).is_none());
    assert!(extract_score(&[], "Иванов", Strategy::SumUntilTotal).is_none());
}

#[test]
fn test_extract_from_csv_text() {
    let text = "\u{feff}Ведомость\nФИО,лр1,лр2,Итог\n\"Иванов, Пётр\",5,7,12\n";
    let g = parse_csv(text).unwrap();
    let result = extract_score(&g, "Иванов", Strategy::PreferTotal).unwrap();
    assert_eq!(result.score, Some(12.0));
    assert_eq!(result.matched_row[0], "Иванов, Пётр");
}
