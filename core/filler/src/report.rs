//! FILENAME: core/filler/src/report.rs
//! PURPOSE: Orchestrates one document's fill run on an in-memory Grid.
//! CONTEXT: Condition detection -> optional roster row insertion -> per-field
//! label/slot resolution and writes. Persisting the Grid is the caller's job;
//! everything here is synchronous and touches only the Grid it is given.

use std::collections::{BTreeMap, HashSet};

use engine::{coord_to_a1, CellCoord, Grid};
use log::{debug, info, warn};

use crate::condition::detect_condition;
use crate::config::FillConfig;
use crate::fields::{FieldValue, FieldValues};
use crate::locator::{find_by_keywords, find_label};
use crate::result::{FieldOutcome, FillResult, FillStatus};
use crate::roster::RosterSource;
use crate::slot::probe_cells;

/// Where a field's value should go, decided while probing around its label.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SlotResolution {
    Free(CellCoord),
    AlreadyFilled(CellCoord, String),
    Unavailable,
}

/// The fill engine. Holds only immutable configuration and can be shared
/// across worker threads; each call owns the Grid it mutates.
#[derive(Debug, Clone)]
pub struct ReportFillEngine {
    config: FillConfig,
}

impl ReportFillEngine {
    pub fn new(config: FillConfig) -> Self {
        ReportFillEngine { config }
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Reads the document-level condition from the sheet.
    pub fn detect_condition(&self, grid: &Grid) -> bool {
        detect_condition(grid, &self.config.condition_keywords, self.config.condition_offset)
    }

    /// Full run: detect the condition, merge roster fields for `address` on
    /// top of `data_fields`, then fill. Returns the merged field set with the
    /// result so callers can report intended fields on a later failure.
    pub fn run(
        &self,
        grid: &mut Grid,
        data_fields: &FieldValues,
        roster: Option<&dyn RosterSource>,
        address: &str,
    ) -> (FieldValues, FillResult) {
        let condition = self.detect_condition(grid);
        info!("condition detected: {}", if condition { "yes" } else { "no" });

        let mut fields = data_fields.clone();
        if let Some(source) = roster {
            match source.composition(address, condition) {
                Some(composition) => {
                    info!("roster for '{}' adds {} field(s)", address, composition.len());
                    fields.merge_from(&composition);
                }
                None => warn!("no roster found for '{}' (condition {})", address, condition),
            }
        }

        let result = self.fill(grid, &fields, condition);
        (fields, result)
    }

    /// Inserts the blank roster row(s) when the condition holds and the roster
    /// field is present. Returns the row where insertion happened.
    /// A missing anchor is not an error: the run continues without insertion.
    pub fn adjust_rows(&self, grid: &mut Grid, condition: bool, fields: &FieldValues) -> Option<u32> {
        if !condition || !fields.contains(&self.config.roster_field) || self.config.inserted_rows == 0 {
            return None;
        }
        match find_by_keywords(grid, &self.config.roster_anchor_keywords, None) {
            Some((anchor_row, _)) => {
                let start_row = anchor_row + 1;
                grid.insert_rows(start_row, self.config.inserted_rows);
                info!(
                    "inserted {} row(s) for '{}' below row {}",
                    self.config.inserted_rows, self.config.roster_field, anchor_row
                );
                Some(start_row)
            }
            None => {
                warn!(
                    "roster anchor {:?} not found, '{}' goes into existing fields",
                    self.config.roster_anchor_keywords, self.config.roster_field
                );
                None
            }
        }
    }

    /// Row adjustment followed by the field resolution loop.
    pub fn fill(&self, grid: &mut Grid, fields: &FieldValues, condition: bool) -> FillResult {
        let inserted_rows_at = self.adjust_rows(grid, condition, fields);

        let mut claimed: HashSet<CellCoord> = HashSet::new();
        let mut filled_count = 0usize;
        let mut missing_fields = Vec::new();
        let mut conflicts = BTreeMap::new();
        let mut outcomes = Vec::with_capacity(fields.len());

        for field in fields {
            let outcome = self.fill_field(grid, field, &mut claimed);
            match &outcome {
                FieldOutcome::Filled { slot, .. } => {
                    filled_count += 1;
                    debug!("'{}' = '{}' -> {}", field.name, field.value, coord_to_a1(*slot));
                }
                FieldOutcome::AlreadyFilled { .. } => {
                    warn!("'{}': {}", field.name, outcome.describe());
                    conflicts.insert(field.name.clone(), outcome.describe());
                }
                FieldOutcome::LabelNotFound | FieldOutcome::SlotUnavailable { .. } => {
                    warn!("'{}': {}", field.name, outcome.describe());
                    missing_fields.push(field.name.clone());
                }
            }
            outcomes.push((field.name.clone(), outcome));
        }

        FillResult {
            status: FillStatus::Success,
            filled_count,
            missing_fields,
            conflicts,
            condition,
            inserted_rows_at,
            outcomes,
        }
    }

    fn fill_field(&self, grid: &mut Grid, field: &FieldValue, claimed: &mut HashSet<CellCoord>) -> FieldOutcome {
        let label = match self.config.override_for(&field.name) {
            Some(coord) => coord,
            None => match find_label(grid, &field.name, self.config.label_threshold, self.config.label_policy) {
                Some(found) => {
                    debug!(
                        "'{}' matched label '{}' at {} (score {})",
                        field.name,
                        found.text,
                        coord_to_a1((found.row, found.col)),
                        found.score
                    );
                    (found.row, found.col)
                }
                None => return FieldOutcome::LabelNotFound,
            },
        };

        match self.resolve_slot(grid, label, &field.value, claimed) {
            SlotResolution::Free(slot) => {
                grid.write(slot.0, slot.1, field.value.as_str());
                claimed.insert(slot);
                FieldOutcome::Filled { label, slot }
            }
            SlotResolution::AlreadyFilled(slot, existing) => FieldOutcome::AlreadyFilled { label, slot, existing },
            SlotResolution::Unavailable => FieldOutcome::SlotUnavailable { label },
        }
    }

    /// Walks the probe order once. A free unclaimed cell wins; a cell already
    /// holding exactly this value means an earlier run filled it.
    fn resolve_slot(&self, grid: &Grid, label: CellCoord, value: &str, claimed: &HashSet<CellCoord>) -> SlotResolution {
        let wanted = value.trim();
        for (row, col) in probe_cells(grid, label.0, label.1, self.config.max_distance) {
            if claimed.contains(&(row, col)) {
                continue;
            }
            if grid.is_writable(row, col) {
                return SlotResolution::Free((row, col));
            }
            if let Some(existing) = grid.read(row, col) {
                let existing = existing.display_value();
                if !wanted.is_empty() && existing.trim() == wanted {
                    return SlotResolution::AlreadyFilled((row, col), existing);
                }
            }
        }
        SlotResolution::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{RosterKey, RosterTable};
    use engine::{CellValue, MergedRegion};

    fn engine() -> ReportFillEngine {
        ReportFillEngine::new(FillConfig::default())
    }

    fn template() -> Grid {
        let mut grid = Grid::new();
        grid.set_cell(1, 1, "Акт готовности объекта");
        grid.set_cell(3, 1, "Адрес");
        grid.set_cell(4, 1, "Председатель");
        grid.set_cell(5, 1, "Член комиссии");
        grid.set_cell(6, 1, "Ресурсник");
        grid.set_cell(7, 1, "Газоснабжение");
        grid.set_cell(8, 1, "нет");
        grid.set_cell(10, 6, "подпись");
        grid
    }

    #[test]
    fn test_fills_fields_right_of_labels() {
        let mut grid = template();
        let fields: FieldValues = [("Адрес", "ул. Ленина, 1"), ("Председатель", "Иванов")].into_iter().collect();
        let result = engine().fill(&mut grid, &fields, false);

        assert_eq!(result.status, FillStatus::Success);
        assert_eq!(result.filled_count, 2);
        assert!(result.missing_fields.is_empty());
        assert_eq!(grid.read(3, 2), Some(&CellValue::text("ул. Ленина, 1")));
        assert_eq!(result.slot_of("Председатель"), Some((4, 2)));
    }

    #[test]
    fn test_unknown_field_is_missing() {
        let mut grid = template();
        let fields: FieldValues = [("Главный инженер", "Иванов")].into_iter().collect();
        let result = engine().fill(&mut grid, &fields, false);

        assert_eq!(result.filled_count, 0);
        assert_eq!(result.missing_fields, vec!["Главный инженер".to_string()]);
        assert_eq!(result.outcomes[0].1, FieldOutcome::LabelNotFound);
        assert_eq!(grid.journal().write_count(), 0);
    }

    #[test]
    fn test_no_free_slot_is_missing() {
        let mut grid = template();
        for col in 2..=6 {
            grid.set_cell(3, col, "занято");
        }
        grid.set_cell(4, 1, "занято");
        grid.set_cell(5, 1, "занято");
        grid.set_cell(6, 1, "занято");
        grid.set_cell(7, 1, "занято");
        grid.set_cell(8, 1, "занято");
        let fields: FieldValues = [("Адрес", "ул. Ленина, 1")].into_iter().collect();
        let result = engine().fill(&mut grid, &fields, false);

        assert_eq!(result.missing_fields, vec!["Адрес".to_string()]);
        assert_eq!(result.outcomes[0].1, FieldOutcome::SlotUnavailable { label: (3, 1) });
    }

    #[test]
    fn test_manual_override_is_the_label_cell() {
        let mut config = FillConfig::default();
        config.manual_overrides.insert("Кадастровый номер".to_string(), "D3".to_string());
        let engine = ReportFillEngine::new(config);

        let mut grid = template();
        let fields: FieldValues = [("Кадастровый номер", "77:01:0001")].into_iter().collect();
        let result = engine.fill(&mut grid, &fields, false);

        assert_eq!(result.filled_count, 1);
        assert_eq!(result.outcomes[0].1, FieldOutcome::Filled { label: (3, 4), slot: (3, 5) });

        // An override pointing at a corner with no room reports the field missing.
        let mut config = FillConfig::default();
        config.manual_overrides.insert("Кадастровый номер".to_string(), "E10".to_string());
        let mut grid = template();
        let result = ReportFillEngine::new(config).fill(&mut grid, &fields, false);
        assert_eq!(result.missing_fields, vec!["Кадастровый номер".to_string()]);
    }

    #[test]
    fn test_rows_inserted_under_roster_anchor() {
        let mut grid = template();
        grid.add_merged_region(MergedRegion::new(4, 2, 6, 4)).unwrap();
        let fields: FieldValues = [("Ресурсник", "Петров")].into_iter().collect();
        let result = engine().fill(&mut grid, &fields, true);

        assert_eq!(result.inserted_rows_at, Some(6));
        assert_eq!(grid.get_cell(7, 1), Some(&CellValue::text("Ресурсник")));
        assert_eq!(grid.merged_regions()[0], MergedRegion::new(4, 2, 7, 4));
    }

    #[test]
    fn test_no_insertion_without_condition_or_anchor() {
        let fields: FieldValues = [("Ресурсник", "Петров")].into_iter().collect();

        let mut grid = template();
        assert_eq!(engine().adjust_rows(&mut grid, false, &fields), None);

        let mut grid = Grid::new();
        grid.set_cell(1, 1, "Ресурсник");
        assert_eq!(engine().adjust_rows(&mut grid, true, &fields), None);
        assert!(grid.journal().is_empty());
    }

    #[test]
    fn test_slots_are_never_shared() {
        let mut grid = Grid::new();
        grid.set_cell(1, 1, "Подпись");
        grid.set_cell(1, 3, "x");
        grid.set_cell(3, 3, "x");
        // Two fields whose best label is the same cell; one value is empty so
        // the first slot stays nominally empty after the write.
        let fields: FieldValues = [("Подпись", ""), ("Подпись:", "Иванов")].into_iter().collect();
        let result = engine().fill(&mut grid, &fields, false);

        let first = result.slot_of("Подпись").unwrap();
        let second = result.slot_of("Подпись:").unwrap();
        assert_ne!(first, second);
        assert_eq!(first, (1, 2));
        assert_eq!(second, (2, 1));
    }

    #[test]
    fn test_rerun_reports_conflicts_and_changes_nothing() {
        let mut grid = template();
        let fields: FieldValues = [("Адрес", "ул. Ленина, 1"), ("Председатель", "Иванов")].into_iter().collect();
        let first = engine().fill(&mut grid, &fields, false);
        assert_eq!(first.filled_count, 2);

        let before = grid.clone();
        let second = engine().fill(&mut grid, &fields, false);

        assert_eq!(second.filled_count, 0);
        assert!(second.missing_fields.is_empty());
        assert_eq!(second.conflicts.len(), 2);
        assert!(second.conflicts["Адрес"].contains("ул. Ленина, 1"));
        assert_eq!(grid.journal().write_count(), before.journal().write_count());
        for row in 1..=before.max_row {
            for col in 1..=before.max_col {
                assert_eq!(grid.read(row, col), before.read(row, col));
            }
        }
    }

    #[test]
    fn test_run_merges_roster_using_detected_condition() {
        let mut roster = RosterTable::new();
        roster.insert_address("ул. Ленина, 1", "Центральный");
        roster.insert_composition(
            RosterKey::new("Центральный", false),
            [("Председатель", "Сидоров")].into_iter().collect(),
        );

        let mut grid = template();
        let data: FieldValues = [("Председатель", "из данных"), ("Адрес", "ул. Ленина, 1")].into_iter().collect();
        let (fields, result) = engine().run(&mut grid, &data, Some(&roster), "ул. Ленина, 1");

        assert!(!result.condition);
        assert_eq!(fields.get("Председатель"), Some("Сидоров"));
        assert_eq!(grid.read(4, 2), Some(&CellValue::text("Сидоров")));
        assert_eq!(result.filled_count, 2);
    }
}
