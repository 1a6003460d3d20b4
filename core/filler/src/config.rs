//! FILENAME: core/filler/src/config.rs
//! PURPOSE: Immutable options for the fill engine.
//! CONTEXT: Parsed once (JSON via serde) and passed into `ReportFillEngine::new`.
//! Nothing is re-read while documents are being processed.

use std::collections::BTreeMap;
use std::path::Path;

use engine::{is_strict_a1, parse_a1, CellCoord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locator::LabelPolicy;
use crate::slot::DEFAULT_MAX_DISTANCE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manual override for '{field}' is not an A1 coordinate: '{coordinate}'")]
    InvalidOverride { field: String, coordinate: String },

    #[error("threshold {0} is outside 0..=100")]
    InvalidThreshold(u32),
}

/// Column/row offset from a keyword cell to the cell holding its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOffset {
    pub dx: i32,
    pub dy: i32,
}

impl Default for CellOffset {
    fn default() -> Self {
        CellOffset { dx: 0, dy: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Keywords whose adjacent cell answers the document condition, in priority order.
    pub condition_keywords: Vec<String>,
    pub condition_offset: CellOffset,
    /// Minimum similarity for a cell to count as a field label.
    pub label_threshold: u32,
    pub label_policy: LabelPolicy,
    /// Search radius for the value slot.
    pub max_distance: u32,
    /// Field whose presence (with a true condition) triggers row insertion.
    pub roster_field: String,
    /// Anchor under which the blank roster row is inserted.
    pub roster_anchor_keywords: Vec<String>,
    pub inserted_rows: u32,
    /// Field name -> label cell coordinate ("B12"), bypassing label search.
    pub manual_overrides: BTreeMap<String, String>,
}

impl Default for FillConfig {
    fn default() -> Self {
        FillConfig {
            condition_keywords: vec![
                "газ".to_string(),
                "газоснабжение".to_string(),
                "газопровод".to_string(),
            ],
            condition_offset: CellOffset::default(),
            label_threshold: 85,
            label_policy: LabelPolicy::FirstAboveThreshold,
            max_distance: DEFAULT_MAX_DISTANCE,
            roster_field: "Ресурсник".to_string(),
            roster_anchor_keywords: vec!["Член комиссии".to_string(), "Член".to_string()],
            inserted_rows: 1,
            manual_overrides: BTreeMap::new(),
        }
    }
}

impl FillConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FillConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks thresholds and override coordinates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_threshold > 100 {
            return Err(ConfigError::InvalidThreshold(self.label_threshold));
        }
        for (field, coordinate) in &self.manual_overrides {
            if !is_strict_a1(coordinate) || parse_a1(coordinate).is_none() {
                return Err(ConfigError::InvalidOverride {
                    field: field.clone(),
                    coordinate: coordinate.clone(),
                });
            }
        }
        Ok(())
    }

    /// The label cell configured for `field`, if any.
    pub fn override_for(&self, field: &str) -> Option<CellCoord> {
        self.manual_overrides
            .get(field)
            .filter(|coordinate| is_strict_a1(coordinate))
            .and_then(|coordinate| parse_a1(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FillConfig::default();
        assert_eq!(config.label_threshold, 85);
        assert_eq!(config.max_distance, 5);
        assert_eq!(config.condition_offset, CellOffset { dx: 0, dy: 1 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FillConfig::from_json_str(
            r#"{ "label_threshold": 90, "label_policy": "best_match",
                 "manual_overrides": { "Адрес": "C4" } }"#,
        )
        .unwrap();
        assert_eq!(config.label_threshold, 90);
        assert_eq!(config.label_policy, LabelPolicy::BestMatch);
        assert_eq!(config.max_distance, 5);
        assert_eq!(config.override_for("Адрес"), Some((4, 3)));
        assert_eq!(config.override_for("Председатель"), None);
    }

    #[test]
    fn test_rejects_bad_override() {
        let err = FillConfig::from_json_str(r#"{ "manual_overrides": { "Адрес": "c4" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = FillConfig::from_json_str(r#"{ "label_threshold": 101 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(101)));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(FillConfig::from_json_str("{"), Err(ConfigError::Json(_))));
    }
}
