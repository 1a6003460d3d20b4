//! FILENAME: core/engine/src/merge.rs
//! PURPOSE: Merged cell region definition and its row-insertion remapping.
//! CONTEXT: Regions come from the template author. The top-left cell is the
//! "master" cell holding the merged content; every other member defers to it.

use crate::coord::{coord_to_a1, parse_a1_range, CellCoord};
use serde::{Deserialize, Serialize};

/// A merged cell region, inclusive on all four bounds, 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MergedRegion {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl MergedRegion {
    /// Builds a region from two corners in any order.
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        MergedRegion {
            min_row: start_row.min(end_row),
            min_col: start_col.min(end_col),
            max_row: start_row.max(end_row),
            max_col: start_col.max(end_col),
        }
    }

    /// Parses "A1:B3" style references.
    pub fn from_a1(reference: &str) -> Option<Self> {
        let ((r1, c1), (r2, c2)) = parse_a1_range(reference)?;
        Some(MergedRegion::new(r1, c1, r2, c2))
    }

    pub fn to_a1(&self) -> String {
        format!(
            "{}:{}",
            coord_to_a1((self.min_row, self.min_col)),
            coord_to_a1((self.max_row, self.max_col))
        )
    }

    pub fn top_left(&self) -> CellCoord {
        (self.min_row, self.min_col)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }

    pub fn overlaps(&self, other: &MergedRegion) -> bool {
        !(self.max_row < other.min_row
            || self.min_row > other.max_row
            || self.max_col < other.min_col
            || self.min_col > other.max_col)
    }

    /// Where this region lands after `count` blank rows are inserted at `start_row`.
    ///
    /// Exactly one of three cases applies:
    /// - entirely above the insertion point: unchanged;
    /// - insertion point strictly inside (`min_row < start_row <= max_row`):
    ///   anchor stays, `max_row` grows by `count`;
    /// - starting at or below the insertion point: both row bounds shift.
    pub fn shifted_for_row_insert(&self, start_row: u32, count: u32) -> MergedRegion {
        if self.min_row >= start_row {
            MergedRegion {
                min_row: self.min_row + count,
                max_row: self.max_row + count,
                ..*self
            }
        } else if start_row <= self.max_row {
            MergedRegion {
                max_row: self.max_row + count,
                ..*self
            }
        } else {
            *self
        }
    }
}
