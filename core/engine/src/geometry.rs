//! FILENAME: core/engine/src/geometry.rs
//! PURPOSE: Merge-aware cell read / occupancy / write on the Grid.
//! CONTEXT: Only the top-left cell of a merged region holds a value. Every
//! other member coordinate defers to it for reads and occupancy tests.
//! Writes are NOT redirected: callers must pass a canonical coordinate.

use crate::cell::CellValue;
use crate::coord::CellCoord;
use crate::grid::Grid;
use crate::journal::GridEdit;
use crate::merge::MergedRegion;

impl Grid {
    /// The merged region containing (row, col), if any.
    pub fn region_at(&self, row: u32, col: u32) -> Option<&MergedRegion> {
        self.merged_regions.iter().find(|r| r.contains(row, col))
    }

    /// The coordinate that holds the value for (row, col): the region's
    /// top-left cell for merged members, the cell itself otherwise.
    pub fn canonical(&self, row: u32, col: u32) -> CellCoord {
        self.region_at(row, col)
            .map(|r| r.top_left())
            .unwrap_or((row, col))
    }

    /// Effective value at (row, col). None when the holding cell is absent.
    pub fn read(&self, row: u32, col: u32) -> Option<&CellValue> {
        let (r, c) = self.canonical(row, col);
        self.cells.get(&(r, c))
    }

    /// True iff the effective value is absent, empty, or whitespace-only.
    pub fn is_writable(&self, row: u32, col: u32) -> bool {
        self.read(row, col).map_or(true, CellValue::is_blank)
    }

    /// Writes `value` directly to (row, col) and journals the edit.
    ///
    /// Writing to a non-top-left member of a merged region stores a value
    /// that `read` will never return; resolve with `canonical` first.
    pub fn write(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        let value = value.into();
        let previous = self.cells.insert((row, col), value.clone());
        self.extend_bounds(row, col);
        self.journal.record(GridEdit::SetValue { row, col, value, previous });
    }
}
