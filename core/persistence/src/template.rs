//! FILENAME: core/persistence/src/template.rs
//! PURPOSE: Opens a report template as a Grid and saves the filled copy.
//! CONTEXT: umya-spreadsheet keeps the whole workbook (styles, print setup,
//! formulas, other sheets) in memory. The Grid is a value-only projection of
//! the active sheet. On save the Grid's edit journal is replayed onto the
//! workbook in order, so whatever the Grid does not model is written back
//! untouched.

use std::path::{Path, PathBuf};

use engine::{parse_a1, CellValue, Grid, GridEdit, MergedRegion};
use log::{debug, warn};
use umya_spreadsheet::{CellRawValue, Spreadsheet, Worksheet};

use crate::PersistenceError;

pub struct TemplateDocument {
    path: PathBuf,
    book: Spreadsheet,
    sheet_name: String,
    grid: Grid,
    /// Journal entries already applied to `book`.
    replayed: usize,
}

impl TemplateDocument {
    /// Reads the workbook and projects its active sheet into a Grid.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| PersistenceError::Template(format!("{}: {}", path.display(), e)))?;

        let sheet = book.get_active_sheet();
        let sheet_name = sheet.get_name().to_string();
        let grid = grid_from_sheet(sheet);
        debug!(
            "opened {} (sheet '{}', {} cell(s), {} merged region(s))",
            path.display(),
            sheet_name,
            grid.cell_count(),
            grid.merged_regions().len()
        );

        Ok(TemplateDocument {
            path: path.to_path_buf(),
            book,
            sheet_name,
            grid,
            replayed: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Applies pending Grid edits to the workbook and writes it to `path`.
    pub fn save(&mut self, path: &Path) -> Result<(), PersistenceError> {
        self.apply_edits()?;
        umya_spreadsheet::writer::xlsx::write(&self.book, path)
            .map_err(|e| PersistenceError::Template(format!("{}: {}", path.display(), e)))?;
        debug!("saved {}", path.display());
        Ok(())
    }

    fn apply_edits(&mut self) -> Result<(), PersistenceError> {
        let edits = &self.grid.journal().edits()[self.replayed..];
        if edits.is_empty() {
            return Ok(());
        }

        let mut rows_inserted = false;
        for edit in edits {
            match edit {
                GridEdit::SetValue { row, col, value, .. } => {
                    let sheet = self
                        .book
                        .get_sheet_by_name_mut(&self.sheet_name)
                        .ok_or_else(|| PersistenceError::SheetNotFound(self.sheet_name.clone()))?;
                    write_value(sheet, *row, *col, value);
                }
                GridEdit::InsertRows { start_row, count } => {
                    // Workbook-level insert also moves references from other sheets.
                    self.book.insert_new_row(&self.sheet_name, start_row, count);
                    rows_inserted = true;
                }
            }
        }
        self.replayed = self.grid.journal().len();

        if rows_inserted {
            self.sync_merges()?;
        }
        Ok(())
    }

    /// Makes the workbook's merged ranges match the Grid's after row inserts.
    fn sync_merges(&mut self) -> Result<(), PersistenceError> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| PersistenceError::SheetNotFound(self.sheet_name.clone()))?;

        let mut saved: Vec<MergedRegion> = sheet
            .get_merge_cells()
            .iter()
            .filter_map(|range| MergedRegion::from_a1(&range.get_range()))
            .collect();
        let mut expected: Vec<MergedRegion> = self.grid.merged_regions().to_vec();
        saved.sort_by_key(|r| (r.min_row, r.min_col));
        expected.sort_by_key(|r| (r.min_row, r.min_col));

        if saved != expected {
            warn!(
                "{}: merged ranges differ after row insertion, rewriting {} range(s)",
                self.path.display(),
                expected.len()
            );
            sheet.get_merge_cells_mut().clear();
            for region in &expected {
                sheet.add_merge_cells(region.to_a1());
            }
        }
        Ok(())
    }
}

/// Builds the value projection of one worksheet. Formula cells without a
/// cached result are kept as their formula text so they never look empty.
fn grid_from_sheet(sheet: &Worksheet) -> Grid {
    let mut grid = Grid::new();

    for cell in sheet.get_cell_collection() {
        let reference = cell.get_coordinate().get_coordinate();
        let Some((row, col)) = parse_a1(&reference) else {
            warn!("skipping cell with unreadable coordinate '{}'", reference);
            continue;
        };

        let value = match cell.get_raw_value() {
            CellRawValue::Numeric(n) => CellValue::Number(*n),
            CellRawValue::Bool(b) => CellValue::Boolean(*b),
            _ => {
                let text = cell.get_value();
                if !text.is_empty() {
                    CellValue::Text(text.to_string())
                } else if cell.is_formula() {
                    CellValue::Text(format!("={}", cell.get_formula()))
                } else {
                    continue;
                }
            }
        };
        grid.set_cell(row, col, value);
    }

    for range in sheet.get_merge_cells() {
        let reference = range.get_range();
        match MergedRegion::from_a1(&reference) {
            Some(region) => {
                if let Err(e) = grid.add_merged_region(region) {
                    warn!("ignoring merged range {}: {}", reference, e);
                }
            }
            None => warn!("ignoring unreadable merged range '{}'", reference),
        }
    }

    grid
}

fn write_value(sheet: &mut Worksheet, row: u32, col: u32, value: &CellValue) {
    let cell = sheet.get_cell_mut((col, row));
    match value {
        CellValue::Empty => {
            cell.set_value_string("");
        }
        CellValue::Number(n) => {
            cell.set_value_number(*n);
        }
        CellValue::Text(s) => {
            cell.set_value_string(s.as_str());
        }
        CellValue::Boolean(b) => {
            cell.set_value_bool(*b);
        }
    }
}
