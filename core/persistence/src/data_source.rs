//! FILENAME: core/persistence/src/data_source.rs
//! PURPOSE: Reads the upstream (field name, value) workbook for one address.
//! CONTEXT: First worksheet, first row is a header. Column A holds the field
//! name, column B the value. Rows missing either are skipped.

use std::path::Path;

use filler::FieldValues;
use log::debug;

use crate::sheet_reader::{cell_at, read_first_sheet};
use crate::PersistenceError;

/// Loads field values in sheet order. A repeated field name keeps its first
/// position and takes the later value.
pub fn read_field_values(path: &Path) -> Result<FieldValues, PersistenceError> {
    let rows = read_first_sheet(path)?;
    let mut values = FieldValues::new();

    for row in rows.iter().skip(1) {
        let (Some(name), Some(value)) = (cell_at(row, 0), cell_at(row, 1)) else {
            continue;
        };
        values.upsert(name, value);
    }

    debug!("read {} field(s) from {}", values.len(), path.display());
    Ok(values)
}
