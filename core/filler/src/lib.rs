//! FILENAME: core/filler/src/lib.rs
//! PURPOSE: Fills spreadsheet report templates from named field values.
//! CONTEXT: Works purely on `engine::Grid`. Loading and saving documents is
//! the persistence crate's job; batching and data-file discovery live in the app.

pub mod condition;
pub mod config;
pub mod fields;
pub mod locator;
pub mod matcher;
pub mod report;
pub mod result;
pub mod roster;
pub mod slot;

pub use crate::condition::{detect_condition, text_is_truthy, value_is_truthy, TRUTHY_TOKENS};
pub use crate::config::{CellOffset, ConfigError, FillConfig};
pub use crate::fields::{FieldValue, FieldValues};
pub use crate::locator::{find_by_keywords, find_label, LabelMatch, LabelPolicy};
pub use crate::matcher::{fuzzy_match, similarity, MatchOutcome, DEFAULT_MATCH_THRESHOLD};
pub use crate::report::ReportFillEngine;
pub use crate::result::{FieldOutcome, FillResult, FillStatus};
pub use crate::roster::{RosterKey, RosterSource, RosterTable};
pub use crate::slot::{find_slot, find_slot_excluding, probe_cells, DEFAULT_MAX_DISTANCE};
