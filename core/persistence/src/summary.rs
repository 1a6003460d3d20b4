//! FILENAME: core/persistence/src/summary.rs
//! PURPOSE: Writes the per-batch processing summary workbook.

use crate::PersistenceError;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use serde::Serialize;
use std::path::Path;

pub const SUMMARY_SHEET_NAME: &str = "Сводка";

pub const SUMMARY_HEADERS: [&str; 8] = [
    "Файл отчёта",
    "Адрес",
    "Статус",
    "Сообщение",
    "Заполнено полей",
    "Незаполненные поля (из данных)",
    "Наличие газа в отчёте",
    "Конфликты",
];

/// One processed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub file: String,
    pub address: String,
    pub success: bool,
    pub message: String,
    pub filled_count: usize,
    pub missing_fields: Vec<String>,
    pub condition: bool,
    pub conflicts: Vec<String>,
}

impl SummaryRow {
    pub fn status_label(&self) -> &'static str {
        if self.success {
            "Успешно"
        } else {
            "Ошибка"
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Да"
    } else {
        "Нет"
    }
}

pub fn write_summary(rows: &[SummaryRow], path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(SUMMARY_SHEET_NAME)?;

    for (col, title) in SUMMARY_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = index as u32 + 1;
        worksheet.write_string(r, 0, &row.file)?;
        worksheet.write_string(r, 1, &row.address)?;
        worksheet.write_string(r, 2, row.status_label())?;
        worksheet.write_string(r, 3, &row.message)?;
        worksheet.write_number(r, 4, row.filled_count as f64)?;
        worksheet.write_string(r, 5, row.missing_fields.join(", "))?;
        worksheet.write_string(r, 6, yes_no(row.condition))?;
        worksheet.write_string(r, 7, row.conflicts.join("; "))?;
    }

    worksheet.set_column_width(0, 40)?;
    worksheet.set_column_width(1, 30)?;
    worksheet.set_column_width(3, 45)?;
    worksheet.set_column_width(5, 50)?;
    worksheet.set_column_width(7, 50)?;
    worksheet.set_freeze_panes(1, 0)?;

    xlsx.save(path)?;
    Ok(())
}
