//! FILENAME: core/engine/tests/merge_safety.rs
//! Row insertion must keep merged regions disjoint and map each old region
//! to exactly one new region.

use engine::{Grid, MergedRegion};

/// A column of stacked regions plus a few wide ones, all disjoint.
fn layout() -> Vec<MergedRegion> {
    vec![
        MergedRegion::new(1, 1, 1, 6),
        MergedRegion::new(2, 1, 4, 2),
        MergedRegion::new(5, 1, 5, 2),
        MergedRegion::new(6, 1, 9, 2),
        MergedRegion::new(2, 3, 2, 3),
        MergedRegion::new(3, 3, 8, 4),
        MergedRegion::new(9, 3, 9, 6),
        MergedRegion::new(10, 1, 12, 6),
    ]
}

fn assert_disjoint(regions: &[MergedRegion]) {
    for (i, a) in regions.iter().enumerate() {
        for b in regions.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "{} overlaps {}", a.to_a1(), b.to_a1());
        }
    }
}

#[test]
fn insertion_keeps_regions_disjoint_at_every_row() {
    for start_row in 1..=14 {
        for count in 1..=3 {
            let mut grid = Grid::new();
            for region in layout() {
                grid.add_merged_region(region).unwrap();
            }
            grid.insert_rows(start_row, count);

            let after = grid.merged_regions();
            assert_eq!(after.len(), layout().len());
            assert_disjoint(after);
        }
    }
}

#[test]
fn each_region_maps_by_exactly_one_rule() {
    let start_row = 5;
    let count = 2;
    let mut grid = Grid::new();
    for region in layout() {
        grid.add_merged_region(region).unwrap();
    }
    grid.insert_rows(start_row, count);

    for (before, after) in layout().iter().zip(grid.merged_regions()) {
        let above = before.max_row < start_row;
        let inside = before.min_row < start_row && start_row <= before.max_row;
        let below = before.min_row >= start_row;
        assert_eq!([above, inside, below].iter().filter(|b| **b).count(), 1);

        assert_eq!((after.min_col, after.max_col), (before.min_col, before.max_col));
        if above {
            assert_eq!(after, before);
        } else if inside {
            assert_eq!(after.min_row, before.min_row);
            assert_eq!(after.max_row, before.max_row + count);
        } else {
            assert_eq!(after.min_row, before.min_row + count);
            assert_eq!(after.max_row, before.max_row + count);
        }
    }
}
