//! FILENAME: core/engine/src/journal.rs
//! PURPOSE: Ordered record of every mutation applied to a Grid.
//! CONTEXT: The Grid is an in-memory projection of one worksheet. The journal
//! lets the persistence layer replay exactly the same edits onto the on-disk
//! workbook, in the same order, so everything the Grid does not model
//! (styles, formulas, print settings) survives the save untouched.

use crate::cell::CellValue;

/// A single mutation, expressed in the coordinates valid at the time it ran.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEdit {
    /// A value was written to a canonical cell.
    /// `previous` is None when the cell was absent before.
    SetValue {
        row: u32,
        col: u32,
        value: CellValue,
        previous: Option<CellValue>,
    },
    /// `count` blank rows were inserted so that the old `start_row` moved down.
    InsertRows { start_row: u32, count: u32 },
}

/// The journal of edits for one Grid, oldest first.
#[derive(Debug, Clone, Default)]
pub struct EditJournal {
    edits: Vec<GridEdit>,
}

impl EditJournal {
    pub fn new() -> Self {
        EditJournal { edits: Vec::new() }
    }

    pub fn record(&mut self, edit: GridEdit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[GridEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of `SetValue` entries.
    pub fn write_count(&self) -> usize {
        self.edits
            .iter()
            .filter(|e| matches!(e, GridEdit::SetValue { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }
}
