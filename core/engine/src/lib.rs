//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the worksheet engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod coord;
pub mod geometry;
pub mod grid;
pub mod journal;
pub mod merge;
pub mod structure;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use coord::{coord_to_a1, col_to_index, index_to_col, is_strict_a1, parse_a1, parse_a1_range, CellCoord};
pub use grid::{Grid, GridError, Rect};
pub use journal::{EditJournal, GridEdit};
pub use merge::MergedRegion;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_manages_grid() {
        let mut grid = Grid::new();
        grid.set_cell(1, 1, "Hello");

        let retrieved = grid.read(1, 1);
        assert_eq!(retrieved, Some(&CellValue::text("Hello")));
    }

    #[test]
    fn it_serializes_regions() {
        let region = MergedRegion::new(3, 1, 6, 2);
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(json, r#"{"min_row":3,"min_col":1,"max_row":6,"max_col":2}"#);
    }

    #[test]
    fn integration_test_insert_then_write() {
        let mut grid = Grid::new();
        let label = parse_a1("A4").unwrap();
        grid.set_cell(label.0, label.1, "Член комиссии");
        grid.add_merged_region(MergedRegion::from_a1("B4:D5").unwrap()).unwrap();

        grid.insert_rows(5, 1);
        assert_eq!(grid.merged_regions()[0].to_a1(), "B4:D6");

        let (r, c) = grid.canonical(6, 3);
        assert!(grid.is_writable(r, c));
        grid.write(r, c, "Петров");
        assert_eq!(grid.read(6, 4), Some(&CellValue::text("Петров")));
        assert_eq!(grid.journal().len(), 2);
    }
}
