//! FILENAME: tests/test_discovery.rs
//! Integration tests for report and data file discovery.

mod common;

use common::Workspace;
use formfill_lib::{find_data_file, scan_reports};

#[test]
fn test_scan_recurses_and_sorts() {
    let ws = Workspace::new();
    ws.touch("reports/район 2/Акт (б).xlsx");
    ws.touch("reports/Акт (а).xlsx");
    ws.touch("reports/район 1/Акт (в).XLSX");

    let found = scan_reports(&ws.reports, "_FILLED");
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(&ws.reports).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["Акт (а).xlsx", "район 1/Акт (в).XLSX", "район 2/Акт (б).xlsx"]);
}

#[test]
fn test_scan_skips_outputs_locks_and_other_files() {
    let ws = Workspace::new();
    let keep = ws.touch("reports/Акт (ул. Ленина, 1).xlsx");
    ws.touch("reports/Акт (ул. Ленина, 1)_FILLED.xlsx");
    ws.touch("reports/~$Акт (ул. Ленина, 1).xlsx");
    ws.touch("reports/Акт (пр. Мира, 5).xls");
    ws.touch("reports/readme.txt");

    assert_eq!(scan_reports(&ws.reports, "_FILLED"), vec![keep]);
}

#[test]
fn test_scan_of_missing_folder_is_empty() {
    let ws = Workspace::new();
    assert!(scan_reports(&ws.dir.path().join("nope"), "_FILLED").is_empty());
}

#[test]
fn test_data_lookup_ignores_case_and_takes_first() {
    let ws = Workspace::new();
    ws.touch("data/b/Объемы УЛ. ЛЕНИНА, 1.xlsx");
    let first = ws.touch("data/a/объемы ул. Ленина, 1.xlsx");
    ws.touch("data/a/Объемы ул. Ленина, 1.csv");

    assert_eq!(find_data_file(&ws.data, "ул. Ленина, 1", None), Some(first));
    assert_eq!(find_data_file(&ws.data, "пр. Мира, 5", None), None);
}

#[test]
fn test_data_lookup_with_marker() {
    let ws = Workspace::new();
    ws.touch("data/Смета ул. Ленина, 1.xlsx");
    let marked = ws.touch("data/Объемы выполненных работ ул. Ленина, 1.xlsx");

    let found = find_data_file(&ws.data, "ул. Ленина, 1", Some("Объемы выполненных работ"));
    assert_eq!(found, Some(marked));
    assert_eq!(find_data_file(&ws.data, "ул. Ленина, 1", Some("Акт")), None);
}
