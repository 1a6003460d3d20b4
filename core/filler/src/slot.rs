//! FILENAME: core/filler/src/slot.rs
//! PURPOSE: Finds the cell that should receive a label's value.
//! CONTEXT: Probes rightward first, then downward, up to a fixed radius and
//! never past the grid's used bounds. Probed coordinates are resolved to the
//! canonical (top-left) cell, so a returned slot is always safe to write.

use std::collections::HashSet;

use engine::{CellCoord, Grid};

/// Default search radius in cells.
pub const DEFAULT_MAX_DISTANCE: u32 = 5;

/// Canonical cells around a label in probe order: `(row, col+1..=col+k)`
/// then `(row+1..=row+k, col)`. The label's own canonical cell and
/// consecutive repeats (several probes landing in one merged region) are
/// dropped.
pub fn probe_cells(grid: &Grid, label_row: u32, label_col: u32, max_distance: u32) -> Vec<CellCoord> {
    let label = grid.canonical(label_row, label_col);
    let mut probes: Vec<CellCoord> = Vec::new();

    let push = |coord: CellCoord, probes: &mut Vec<CellCoord>| {
        if coord != label && probes.last() != Some(&coord) {
            probes.push(coord);
        }
    };

    for k in 1..=max_distance {
        let target_col = label_col + k;
        if target_col > grid.max_col {
            break;
        }
        push(grid.canonical(label_row, target_col), &mut probes);
    }

    for k in 1..=max_distance {
        let target_row = label_row + k;
        if target_row > grid.max_row {
            break;
        }
        push(grid.canonical(target_row, label_col), &mut probes);
    }

    probes
}

/// First writable cell near the label, or None within the radius.
pub fn find_slot(grid: &Grid, label_row: u32, label_col: u32, max_distance: u32) -> Option<CellCoord> {
    find_slot_excluding(grid, label_row, label_col, max_distance, &HashSet::new())
}

/// Like `find_slot`, but cells in `claimed` count as occupied even when empty.
pub fn find_slot_excluding(
    grid: &Grid,
    label_row: u32,
    label_col: u32,
    max_distance: u32,
    claimed: &HashSet<CellCoord>,
) -> Option<CellCoord> {
    probe_cells(grid, label_row, label_col, max_distance)
        .into_iter()
        .find(|&(r, c)| !claimed.contains(&(r, c)) && grid.is_writable(r, c))
}
