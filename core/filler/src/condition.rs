//! FILENAME: core/filler/src/condition.rs
//! PURPOSE: Boolean keyword vocabulary and document-level condition detection.

use engine::{CellValue, Grid};
use log::debug;

use crate::config::CellOffset;
use crate::locator::find_by_keywords;

/// Tokens read as true, compared after trimming and lowercasing.
pub const TRUTHY_TOKENS: [&str; 5] = ["да", "true", "есть", "yes", "+"];

/// Interprets free text as a boolean. Anything outside the vocabulary is false.
pub fn text_is_truthy(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&lower.as_str())
}

/// Interprets a cell value as a boolean. Absent and empty cells are false.
pub fn value_is_truthy(value: Option<&CellValue>) -> bool {
    match value {
        None | Some(CellValue::Empty) => false,
        Some(CellValue::Boolean(b)) => *b,
        Some(other) => text_is_truthy(&other.display_value()),
    }
}

/// Checks each keyword in order: locate it literally, then read the cell at
/// `offset` from it. The first keyword whose offset cell is truthy yields
/// true. No keyword found, or offsets outside the sheet, yield false.
pub fn detect_condition<S: AsRef<str>>(grid: &Grid, keywords: &[S], offset: CellOffset) -> bool {
    for keyword in keywords {
        let Some((row, col)) = find_by_keywords(grid, std::slice::from_ref(keyword), None) else {
            continue;
        };
        let target_row = row as i64 + offset.dy as i64;
        let target_col = col as i64 + offset.dx as i64;
        if target_row < 1 || target_col < 1 || target_row > u32::MAX as i64 || target_col > u32::MAX as i64 {
            continue;
        }

        let value = grid.read(target_row as u32, target_col as u32);
        debug!(
            "condition keyword '{}' at ({}, {}), offset cell = {:?}",
            keyword.as_ref(),
            row,
            col,
            value
        );
        if value_is_truthy(value) {
            return true;
        }
    }
    false
}
