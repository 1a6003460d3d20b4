//! FILENAME: core/persistence/src/lib.rs
//! Report Filler Persistence Module
//!
//! Handles every file the filler touches: report templates (opened and saved
//! losslessly), upstream field/value workbooks, the commission roster tables
//! and the batch summary.

mod data_source;
mod error;
mod roster_tables;
mod sheet_reader;
mod summary;
mod template;

pub use data_source::read_field_values;
pub use error::PersistenceError;
pub use roster_tables::{load_address_map, load_commission_types, load_roster, RosterColumns};
pub use sheet_reader::{cell_text, format_number, read_first_sheet, SheetRows};
pub use summary::{write_summary, SummaryRow, SUMMARY_HEADERS, SUMMARY_SHEET_NAME};
pub use template::TemplateDocument;

/// Extension of every workbook this crate reads or writes.
pub const XLSX_EXTENSION: &str = "xlsx";
