//! FILENAME: core/filler/src/locator.rs
//! PURPOSE: Finds label cells on the grid.
//! CONTEXT: Two flavours. `find_by_keywords` is a literal, case-insensitive
//! substring test over string cells, used for coarse anchors (condition
//! keywords, roster anchors). `find_label` scores every cell with the fuzzy
//! matcher and is used to discover field labels.

use engine::{CellCoord, Grid, Rect};
use serde::{Deserialize, Serialize};

use crate::matcher::similarity;

/// How `find_label` chooses among cells that reach the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Stop at the first cell in reading order that reaches the threshold.
    #[default]
    FirstAboveThreshold,
    /// Scan the whole grid and keep the highest score (first one on ties).
    BestMatch,
}

/// A label cell found by `find_label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatch {
    pub row: u32,
    pub col: u32,
    pub score: u32,
    pub text: String,
}

/// First string cell (reading order) inside `scan` containing any keyword,
/// case-insensitively. Empty keywords are ignored.
pub fn find_by_keywords<S: AsRef<str>>(
    grid: &Grid,
    keywords: &[S],
    scan: Option<Rect>,
) -> Option<CellCoord> {
    let lower_keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if lower_keywords.is_empty() {
        return None;
    }

    grid.cells_in_reading_order(scan)
        .into_iter()
        .find(|(_, value)| {
            value.as_text().map_or(false, |text| {
                let text = text.to_lowercase();
                lower_keywords.iter().any(|k| text.contains(k.as_str()))
            })
        })
        .map(|(pos, _)| pos)
}

/// Finds the cell whose text best names `target`, per `policy`.
/// Cells are compared by their trimmed display text; blank cells are skipped.
pub fn find_label(grid: &Grid, target: &str, threshold: u32, policy: LabelPolicy) -> Option<LabelMatch> {
    if target.trim().is_empty() {
        return None;
    }

    let mut best: Option<LabelMatch> = None;
    for ((row, col), value) in grid.cells_in_reading_order(None) {
        if value.is_blank() {
            continue;
        }
        let text = value.display_value();
        let text = text.trim();
        let score = similarity(target, text);
        if score < threshold {
            continue;
        }

        let better = best.as_ref().map_or(true, |b| score > b.score);
        if better {
            best = Some(LabelMatch { row, col, score, text: text.to_string() });
        }
        if policy == LabelPolicy::FirstAboveThreshold {
            break;
        }
    }
    best
}
