//! FILENAME: core/persistence/src/roster_tables.rs
//! PURPOSE: Loads the commission roster from its two workbooks.
//! CONTEXT: The commission types table has region and utility columns
//! followed by one column per role; each row is one composition. The
//! address map assigns every address to a region. Both are plain tables
//! whose first row holds the column headers.

use std::path::Path;

use filler::{text_is_truthy, FieldValues, RosterKey, RosterTable};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::sheet_reader::{cell_at, read_first_sheet};
use crate::PersistenceError;

/// Header names of the key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub region: String,
    pub condition: String,
    pub address: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        RosterColumns {
            region: "Район".to_string(),
            condition: "Газ".to_string(),
            address: "Адрес".to_string(),
        }
    }
}

/// Builds a roster table from the commission types and address map files.
pub fn load_roster(
    types_path: &Path,
    address_map_path: &Path,
    columns: &RosterColumns,
) -> Result<RosterTable, PersistenceError> {
    let mut table = RosterTable::new();
    load_commission_types(types_path, columns, &mut table)?;
    load_address_map(address_map_path, columns, &mut table)?;
    info!(
        "roster loaded: {} composition(s), {} address(es)",
        table.composition_count(),
        table.address_count()
    );
    Ok(table)
}

/// Adds one composition per row. Returns the number of rows loaded.
pub fn load_commission_types(
    path: &Path,
    columns: &RosterColumns,
    table: &mut RosterTable,
) -> Result<usize, PersistenceError> {
    let rows = read_first_sheet(path)?;
    let Some((header, body)) = rows.split_first() else {
        return Err(PersistenceError::InvalidFormat(format!("{} is empty", path.display())));
    };
    let region_col = column_index(header, &columns.region, path)?;
    let condition_col = column_index(header, &columns.condition, path)?;

    let mut loaded = 0;
    for (offset, row) in body.iter().enumerate() {
        let Some(region) = cell_at(row, region_col) else {
            warn!("{}: row {} has no {}, skipped", path.display(), offset + 2, columns.region);
            continue;
        };
        let condition = cell_at(row, condition_col).map_or(false, text_is_truthy);

        let mut fields = FieldValues::new();
        for (col, role) in header.iter().enumerate() {
            if col == region_col || col == condition_col {
                continue;
            }
            if let (Some(role), Some(person)) = (role, cell_at(row, col)) {
                fields.upsert(role.as_str(), person);
            }
        }

        let key = RosterKey::new(region, condition);
        if table.insert_composition(key.clone(), fields).is_some() {
            warn!("{}: duplicate composition for {:?}, last row wins", path.display(), key);
        }
        loaded += 1;
    }
    Ok(loaded)
}

/// Maps every address to its region. The utility column is ignored: the
/// condition always comes from the document being filled.
pub fn load_address_map(
    path: &Path,
    columns: &RosterColumns,
    table: &mut RosterTable,
) -> Result<usize, PersistenceError> {
    let rows = read_first_sheet(path)?;
    let Some((header, body)) = rows.split_first() else {
        return Err(PersistenceError::InvalidFormat(format!("{} is empty", path.display())));
    };
    let address_col = column_index(header, &columns.address, path)?;
    let region_col = column_index(header, &columns.region, path)?;

    let mut loaded = 0;
    for (offset, row) in body.iter().enumerate() {
        let (Some(address), Some(region)) = (cell_at(row, address_col), cell_at(row, region_col)) else {
            warn!("{}: row {} is incomplete, skipped", path.display(), offset + 2);
            continue;
        };
        if table.insert_address(address, region).is_some() {
            warn!("{}: duplicate address '{}', last row wins", path.display(), address);
        }
        loaded += 1;
    }
    Ok(loaded)
}

fn column_index(header: &[Option<String>], name: &str, path: &Path) -> Result<usize, PersistenceError> {
    header
        .iter()
        .position(|h| h.as_deref() == Some(name))
        .ok_or_else(|| PersistenceError::MissingColumn {
            column: name.to_string(),
            file: path.display().to_string(),
        })
}
