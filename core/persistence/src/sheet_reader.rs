// FILENAME: core\persistence\src\sheet_reader.rs

use crate::PersistenceError;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::Path;

/// Text rows of a sheet's used range. Columns are absolute (index 0 is
/// column A); rows start at the first used row. Empty cells are None.
pub type SheetRows = Vec<Vec<Option<String>>>;

/// Reads the first worksheet of a plain data workbook.
pub fn read_first_sheet(path: &Path) -> Result<SheetRows, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let Some(first) = sheet_names.first() else {
        return Err(PersistenceError::InvalidFormat(format!(
            "{} contains no sheets",
            path.display()
        )));
    };

    let range = workbook.worksheet_range(first)?;
    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &Range<Data>) -> SheetRows {
    let Some((_, start_col)) = range.start() else {
        return Vec::new();
    };

    range
        .rows()
        .map(|row| {
            let mut cells: Vec<Option<String>> = vec![None; start_col as usize];
            cells.extend(row.iter().map(cell_text));
            cells
        })
        .collect()
}

/// Trimmed text of a cell. Empty strings and error cells read as None.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Whole numbers print without a fractional part ("12", not "12.0").
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Non-empty cell text at `col` of `row`.
pub fn cell_at(row: &[Option<String>], col: usize) -> Option<&str> {
    row.get(col).and_then(|c| c.as_deref())
}
