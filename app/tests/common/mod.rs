//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for batch integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use formfill_lib::AppConfig;
use rust_xlsxwriter::{Format, Workbook};
use tempfile::TempDir;

pub const LENINA: &str = "ул. Ленина, 1";

/// A temporary folder tree with reports, data and output subfolders.
pub struct Workspace {
    pub dir: TempDir,
    pub reports: PathBuf,
    pub data: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("reports");
        let data = dir.path().join("data");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::create_dir_all(&data).unwrap();
        Workspace { dir, reports, data, output }
    }

    /// Config pointing at this workspace, without a roster.
    pub fn config(&self) -> AppConfig {
        AppConfig {
            reports_folder: Some(self.reports.clone()),
            data_folder: Some(self.data.clone()),
            output_folder: Some(self.output.clone()),
            ..AppConfig::default()
        }
    }

    /// Writes an act template named `name` into the reports folder.
    pub fn add_report(&self, name: &str, gas_answer: &str) -> PathBuf {
        let path = self.reports.join(name);
        write_act_template(&path, gas_answer);
        path
    }

    /// Writes a field/value data file with a header row.
    pub fn add_data(&self, name: &str, fields: &[(&str, &str)]) -> PathBuf {
        let path = self.data.join(name);
        let mut rows: Vec<Vec<&str>> = vec![vec!["Поле", "Значение"]];
        rows.extend(fields.iter().map(|(field, value)| vec![*field, *value]));
        write_rows(&path, &rows);
        path
    }

    /// Commission types and address map for Ленина, 1 in the Центральный region.
    pub fn add_roster(&self) -> (PathBuf, PathBuf) {
        let types = self.dir.path().join("types.xlsx");
        write_rows(
            &types,
            &[
                vec!["Район", "Газ", "Председатель комиссии", "Ресурсник"],
                vec!["Центральный", "Нет", "Сидоров А.А.", ""],
                vec!["Центральный", "Да", "Петров П.П.", "Горгаз"],
            ],
        );
        let map = self.dir.path().join("map.xlsx");
        write_rows(&map, &[vec!["Адрес", "Район", "Газ"], vec![LENINA, "Центральный", "Нет"]]);
        (types, map)
    }

    /// Creates an empty file; enough for discovery tests.
    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"").unwrap();
        path
    }
}

/// Layout (1-based rows): title A1:F1 merged, "Адрес" A3 with B3:F3 merged,
/// gas question A5 with the answer in A6, commission in A8/A9/A11 with
/// B9:D10 merged, "Дата" A13.
pub fn write_act_template(path: &Path, gas_answer: &str) {
    let mut workbook = Workbook::new();
    let plain = Format::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    worksheet.merge_range(0, 0, 0, 5, "АКТ готовности", &bold).unwrap();
    worksheet.write_string(2, 0, "Адрес").unwrap();
    worksheet.merge_range(2, 1, 2, 5, "", &plain).unwrap();
    worksheet.write_string(4, 0, "Наличие газоснабжения").unwrap();
    worksheet.write_string(5, 0, gas_answer).unwrap();
    worksheet.write_string(7, 0, "Председатель комиссии").unwrap();
    worksheet.write_string(8, 0, "Член комиссии").unwrap();
    worksheet.merge_range(8, 1, 9, 3, "", &plain).unwrap();
    worksheet.write_string(10, 0, "Ресурсник").unwrap();
    worksheet.write_string(12, 0, "Дата").unwrap();

    workbook.save(path).unwrap();
}

pub fn write_rows(path: &Path, rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            if !text.is_empty() {
                worksheet.write_string(r as u32, c as u16, *text).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}
