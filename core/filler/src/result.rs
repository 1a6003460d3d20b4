//! FILENAME: core/filler/src/result.rs
//! PURPOSE: Per-document outcome of a fill run.

use std::collections::BTreeMap;

use engine::{coord_to_a1, CellCoord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillStatus {
    Success,
    Error,
}

/// What happened to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldOutcome {
    /// Value written at `slot`.
    Filled { label: CellCoord, slot: CellCoord },
    /// The field's value already sits in a probed cell; nothing written.
    AlreadyFilled { label: CellCoord, slot: CellCoord, existing: String },
    /// No label cell reached the threshold.
    LabelNotFound,
    /// Label found, but no free cell within the search radius.
    SlotUnavailable { label: CellCoord },
}

impl FieldOutcome {
    pub fn describe(&self) -> String {
        match self {
            FieldOutcome::Filled { slot, .. } => format!("filled at {}", coord_to_a1(*slot)),
            FieldOutcome::AlreadyFilled { slot, existing, .. } => {
                format!("{} already contains '{}'", coord_to_a1(*slot), existing)
            }
            FieldOutcome::LabelNotFound => "label not found".to_string(),
            FieldOutcome::SlotUnavailable { label } => {
                format!("no free cell near label at {}", coord_to_a1(*label))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillResult {
    pub status: FillStatus,
    pub filled_count: usize,
    /// Fields that could not be placed, in processing order.
    pub missing_fields: Vec<String>,
    /// Fields whose value was already present, with the reason.
    pub conflicts: BTreeMap<String, String>,
    /// Document-level condition detected on the sheet.
    pub condition: bool,
    /// Row where blank roster rows were inserted, if any.
    pub inserted_rows_at: Option<u32>,
    pub outcomes: Vec<(String, FieldOutcome)>,
}

impl FillResult {
    /// Result for a document whose processing aborted. Every intended field
    /// is reported missing since the saved state is unknown.
    pub fn failed(intended_fields: Vec<String>) -> Self {
        FillResult {
            status: FillStatus::Error,
            filled_count: 0,
            missing_fields: intended_fields,
            conflicts: BTreeMap::new(),
            condition: false,
            inserted_rows_at: None,
            outcomes: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FillStatus::Success
    }

    /// The cell a field was written to in this run.
    pub fn slot_of(&self, field: &str) -> Option<CellCoord> {
        self.outcomes.iter().find_map(|(name, outcome)| match outcome {
            FieldOutcome::Filled { slot, .. } if name == field => Some(*slot),
            _ => None,
        })
    }
}
