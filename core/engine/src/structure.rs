//! FILENAME: core/engine/src/structure.rs
//! PURPOSE: Structural edits on the Grid (row insertion).
//! CONTEXT: Inserting rows moves every cell at or below the insertion point and
//! remaps every merged region by the three-way rule in `MergedRegion`.

use log::debug;

use crate::cell::CellValue;
use crate::grid::Grid;
use crate::journal::GridEdit;
use crate::merge::MergedRegion;

impl Grid {
    /// Inserts `count` blank rows so that the current `start_row` moves to
    /// `start_row + count`. A `start_row` of 0 is treated as 1.
    pub fn insert_rows(&mut self, start_row: u32, count: u32) {
        if count == 0 {
            return;
        }
        let start_row = start_row.max(1);

        // Collect all cells that need to be moved (from start_row onwards)
        let mut cells_to_move: Vec<((u32, u32), CellValue)> = Vec::new();
        for (&(r, c), value) in self.cells.iter() {
            if r >= start_row {
                cells_to_move.push(((r, c), value.clone()));
            }
        }

        // Sort by row descending so we move from bottom to top
        cells_to_move.sort_by(|a, b| b.0 .0.cmp(&a.0 .0));

        for ((r, c), _) in &cells_to_move {
            self.cells.remove(&(*r, *c));
        }
        for ((r, c), value) in cells_to_move {
            self.cells.insert((r + count, c), value);
        }

        // Remap into a fresh collection, then replace.
        let remapped: Vec<MergedRegion> = self
            .merged_regions
            .iter()
            .map(|region| region.shifted_for_row_insert(start_row, count))
            .collect();
        self.merged_regions = remapped;

        if start_row <= self.max_row {
            self.max_row += count;
        }

        self.journal.record(GridEdit::InsertRows { start_row, count });
        debug!("inserted {} row(s) at row {}", count, start_row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_shift_down() {
        let mut grid = Grid::new();
        grid.set_cell(1, 1, "header");
        grid.set_cell(4, 1, "member");
        grid.set_cell(5, 2, "below");
        grid.insert_rows(5, 2);

        assert_eq!(grid.get_cell(1, 1), Some(&CellValue::text("header")));
        assert_eq!(grid.get_cell(4, 1), Some(&CellValue::text("member")));
        assert_eq!(grid.get_cell(5, 2), None);
        assert_eq!(grid.get_cell(7, 2), Some(&CellValue::text("below")));
        assert_eq!(grid.max_row, 7);
    }

    #[test]
    fn test_regions_follow_three_way_rule() {
        let mut grid = Grid::new();
        grid.add_merged_region(MergedRegion::new(1, 1, 2, 4)).unwrap(); // above
        grid.add_merged_region(MergedRegion::new(3, 1, 6, 2)).unwrap(); // straddles
        grid.add_merged_region(MergedRegion::new(6, 3, 6, 4)).unwrap(); // below
        grid.insert_rows(5, 1);

        let regions = grid.merged_regions();
        assert_eq!(regions[0], MergedRegion::new(1, 1, 2, 4));
        assert_eq!(regions[1], MergedRegion::new(3, 1, 7, 2));
        assert_eq!(regions[2], MergedRegion::new(7, 3, 7, 4));
    }

    #[test]
    fn test_insert_past_end_keeps_bounds() {
        let mut grid = Grid::new();
        grid.set_cell(2, 2, "x");
        grid.insert_rows(10, 3);
        assert_eq!(grid.max_row, 2);
        assert_eq!(grid.get_cell(2, 2), Some(&CellValue::text("x")));
    }

    #[test]
    fn test_insert_is_journaled() {
        let mut grid = Grid::new();
        grid.set_cell(3, 1, "x");
        grid.insert_rows(0, 1);
        assert_eq!(grid.get_cell(4, 1), Some(&CellValue::text("x")));
        assert_eq!(
            grid.journal().edits(),
            &[GridEdit::InsertRows { start_row: 1, count: 1 }]
        );
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut grid = Grid::new();
        grid.set_cell(3, 1, "x");
        grid.insert_rows(1, 0);
        assert_eq!(grid.get_cell(3, 1), Some(&CellValue::text("x")));
        assert!(grid.journal().is_empty());
    }
}
