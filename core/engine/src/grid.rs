//! FILENAME: core/engine/src/grid.rs
//! PURPOSE: Manages the collection of cells and merged regions of one sheet.
//! CONTEXT: This file defines the `Grid` struct which acts as the container
//! for all cell data of a template's active sheet. It uses a sparse storage
//! strategy (HashMap) since templates are mostly empty space.
//! Merge-aware reads/writes live in geometry.rs, row insertion in structure.rs.

use std::collections::HashMap;

use thiserror::Error;

use crate::cell::CellValue;
use crate::coord::CellCoord;
use crate::journal::EditJournal;
use crate::merge::MergedRegion;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("merged region {0} overlaps existing region {1}")]
    OverlappingRegion(String, String),

    #[error("merged region {0} has a zero row or column")]
    InvalidRegion(String),
}

/// An inclusive rectangle used to restrict scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl Rect {
    pub fn new(min_row: u32, min_col: u32, max_row: u32, max_col: u32) -> Self {
        Rect { min_row, min_col, max_row, max_col }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }
}

/// The Grid struct holds the state of one worksheet.
/// Row and Col are 1-based indices.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    /// Sparse storage: keys are (row, col).
    pub(crate) cells: HashMap<CellCoord, CellValue>,

    /// Non-overlapping merged regions.
    pub(crate) merged_regions: Vec<MergedRegion>,

    /// Highest row in use, counting merged region extents. 0 when empty.
    pub max_row: u32,

    /// Highest column in use, counting merged region extents. 0 when empty.
    pub max_col: u32,

    pub(crate) journal: EditJournal,
}

impl Grid {
    /// Creates a new, empty Grid.
    pub fn new() -> Self {
        Grid::default()
    }

    /// Sets a cell while building the grid (e.g. when loading a template).
    /// Not journaled; use `write` for edits that must reach the saved document.
    pub fn set_cell(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        self.extend_bounds(row, col);
        self.cells.insert((row, col), value.into());
    }

    /// Raw lookup of the cell at (row, col), ignoring merges.
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Removes a cell from the grid (clearing it).
    pub fn clear_cell(&mut self, row: u32, col: u32) {
        let was_at_boundary = row == self.max_row || col == self.max_col;
        self.cells.remove(&(row, col));

        if was_at_boundary {
            self.recalculate_bounds();
        }
    }

    /// Number of stored cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Registers a merged region. Rejects regions overlapping an existing one.
    pub fn add_merged_region(&mut self, region: MergedRegion) -> Result<(), GridError> {
        if region.min_row == 0 || region.min_col == 0 {
            return Err(GridError::InvalidRegion(format!("{:?}", region)));
        }
        if let Some(existing) = self.merged_regions.iter().find(|r| r.overlaps(&region)) {
            return Err(GridError::OverlappingRegion(region.to_a1(), existing.to_a1()));
        }
        self.extend_bounds(region.max_row, region.max_col);
        self.merged_regions.push(region);
        Ok(())
    }

    pub fn merged_regions(&self) -> &[MergedRegion] {
        &self.merged_regions
    }

    /// Edits applied through `write` and `insert_rows`, oldest first.
    pub fn journal(&self) -> &EditJournal {
        &self.journal
    }

    /// The whole used area, or None for an empty grid.
    pub fn used_rect(&self) -> Option<Rect> {
        if self.max_row == 0 || self.max_col == 0 {
            None
        } else {
            Some(Rect::new(1, 1, self.max_row, self.max_col))
        }
    }

    /// Stored cells inside `scan` (the whole grid when None), sorted by row,
    /// then by column (reading order).
    pub fn cells_in_reading_order(&self, scan: Option<Rect>) -> Vec<(CellCoord, &CellValue)> {
        let mut cells: Vec<(CellCoord, &CellValue)> = self
            .cells
            .iter()
            .filter(|&(&(r, c), _)| scan.map_or(true, |rect| rect.contains(r, c)))
            .map(|(&pos, value)| (pos, value))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells
    }

    /// Recalculates max_row and max_col by scanning all cells and regions.
    pub fn recalculate_bounds(&mut self) {
        let mut new_max_row = 0u32;
        let mut new_max_col = 0u32;

        for &(row, col) in self.cells.keys() {
            new_max_row = new_max_row.max(row);
            new_max_col = new_max_col.max(col);
        }
        for region in &self.merged_regions {
            new_max_row = new_max_row.max(region.max_row);
            new_max_col = new_max_col.max(region.max_col);
        }

        self.max_row = new_max_row;
        self.max_col = new_max_col;
    }

    pub(crate) fn extend_bounds(&mut self, row: u32, col: u32) {
        if row > self.max_row {
            self.max_row = row;
        }
        if col > self.max_col {
            self.max_col = col;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cell_updates_bounds() {
        let mut grid = Grid::new();
        grid.set_cell(3, 2, "Адрес");
        grid.set_cell(1, 5, 12.0);
        assert_eq!(grid.max_row, 3);
        assert_eq!(grid.max_col, 5);
        assert_eq!(grid.get_cell(3, 2), Some(&CellValue::text("Адрес")));
        assert!(grid.journal().is_empty());
    }

    #[test]
    fn test_clear_cell_recalculates_bounds() {
        let mut grid = Grid::new();
        grid.set_cell(1, 1, "a");
        grid.set_cell(4, 4, "b");
        grid.clear_cell(4, 4);
        assert_eq!((grid.max_row, grid.max_col), (1, 1));
    }

    #[test]
    fn test_regions_count_toward_bounds() {
        let mut grid = Grid::new();
        grid.set_cell(1, 1, "Title");
        grid.add_merged_region(MergedRegion::new(2, 1, 6, 8)).unwrap();
        assert_eq!((grid.max_row, grid.max_col), (6, 8));
    }

    #[test]
    fn test_overlapping_region_rejected() {
        let mut grid = Grid::new();
        grid.add_merged_region(MergedRegion::new(1, 1, 2, 2)).unwrap();
        let err = grid.add_merged_region(MergedRegion::new(2, 2, 3, 3)).unwrap_err();
        assert!(matches!(err, GridError::OverlappingRegion(_, _)));
        assert_eq!(grid.merged_regions().len(), 1);
    }

    #[test]
    fn test_zero_based_region_rejected() {
        let mut grid = Grid::new();
        let err = grid.add_merged_region(MergedRegion::new(0, 1, 2, 2)).unwrap_err();
        assert!(matches!(err, GridError::InvalidRegion(_)));
    }

    #[test]
    fn test_cells_in_reading_order() {
        let mut grid = Grid::new();
        grid.set_cell(2, 1, "c");
        grid.set_cell(1, 3, "b");
        grid.set_cell(1, 1, "a");
        grid.set_cell(5, 5, "outside");

        let all: Vec<CellCoord> = grid.cells_in_reading_order(None).iter().map(|(p, _)| *p).collect();
        assert_eq!(all, vec![(1, 1), (1, 3), (2, 1), (5, 5)]);

        let scoped = grid.cells_in_reading_order(Some(Rect::new(1, 1, 2, 3)));
        assert_eq!(scoped.len(), 3);
    }
}
