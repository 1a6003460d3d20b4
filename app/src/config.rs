//! FILENAME: app/src/config.rs
// PURPOSE: Application settings: folders, roster files, naming rules and the
// engine options. Read once at startup, then shared read-only by workers.

use std::path::{Path, PathBuf};

use filler::{ConfigError, FillConfig};
use persistence::RosterColumns;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

/// Address is the text inside the first pair of parentheses.
pub const DEFAULT_ADDRESS_PATTERN: &str = r"\(([^)]+)\)";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_FILLED";

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fill(#[from] ConfigError),

    #[error("invalid address pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("address pattern '{0}' has no capture group")]
    NoCaptureGroup(String),

    #[error("output suffix must not be empty")]
    EmptySuffix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fill: FillConfig,
    /// Regex applied to report file names; capture group 1 is the address.
    pub address_pattern: String,
    /// Substring a data file name must contain besides the address.
    pub data_file_marker: Option<String>,
    /// Appended to the report's file stem for the filled copy.
    pub output_suffix: String,
    pub reports_folder: Option<PathBuf>,
    pub data_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub commission_types_file: Option<PathBuf>,
    pub address_map_file: Option<PathBuf>,
    pub roster_columns: RosterColumns,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            fill: FillConfig::default(),
            address_pattern: DEFAULT_ADDRESS_PATTERN.to_string(),
            data_file_marker: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            reports_folder: None,
            data_folder: None,
            output_folder: None,
            commission_types_file: None,
            address_map_file: None,
            roster_columns: RosterColumns::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AppConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Command-line paths win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        let overrides = [
            (&cli.reports, &mut self.reports_folder),
            (&cli.data, &mut self.data_folder),
            (&cli.output, &mut self.output_folder),
            (&cli.roster_types, &mut self.commission_types_file),
            (&cli.address_map, &mut self.address_map_file),
        ];
        for (from_cli, setting) in overrides {
            if let Some(path) = from_cli {
                *setting = Some(path.clone());
            }
        }
    }

    pub fn validate(&self) -> Result<(), AppConfigError> {
        self.fill.validate()?;
        self.address_regex()?;
        if self.output_suffix.trim().is_empty() {
            return Err(AppConfigError::EmptySuffix);
        }
        Ok(())
    }

    /// Compiled address pattern; it must have at least one capture group.
    pub fn address_regex(&self) -> Result<Regex, AppConfigError> {
        let regex = Regex::new(&self.address_pattern)?;
        if regex.captures_len() < 2 {
            return Err(AppConfigError::NoCaptureGroup(self.address_pattern.clone()));
        }
        Ok(regex)
    }
}
