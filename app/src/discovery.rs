//! FILENAME: app/src/discovery.rs
// PURPOSE: Finds report templates and their data files on disk, and derives
// the address and output names from file names.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, warn};
use persistence::XLSX_EXTENSION;
use regex::Regex;
use walkdir::WalkDir;

/// Office writes `~$name.xlsx` lock files next to open workbooks.
const LOCK_FILE_PREFIX: &str = "~$";

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// All `.xlsx` files below `folder`, sorted by path. Lock files are skipped.
fn xlsx_files(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("cannot read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| !file_name_of(path).starts_with(LOCK_FILE_PREFIX))
        .filter(|path| match extension_of(path).as_deref() {
            Some(XLSX_EXTENSION) => true,
            Some("xls") => {
                warn!("skipping legacy .xls file {}", path.display());
                false
            }
            _ => false,
        })
        .collect()
}

/// Report templates under `folder`. Files whose stem already ends with
/// `output_suffix` are earlier outputs and are left alone.
pub fn scan_reports(folder: &Path, output_suffix: &str) -> Vec<PathBuf> {
    let reports: Vec<PathBuf> = xlsx_files(folder)
        .into_iter()
        .filter(|path| {
            let is_output = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().ends_with(output_suffix))
                .unwrap_or(false);
            if is_output {
                debug!("skipping filled output {}", path.display());
            }
            !is_output
        })
        .collect();
    debug!("found {} report(s) under {}", reports.len(), folder.display());
    reports
}

/// Pulls the address out of a report's file name.
#[derive(Debug, Clone)]
pub struct AddressExtractor {
    pattern: Regex,
}

impl AddressExtractor {
    pub fn new(pattern: Regex) -> Self {
        AddressExtractor { pattern }
    }

    /// Capture group 1 of the pattern, trimmed. None when the name does not
    /// match or the capture is blank.
    pub fn extract(&self, file_name: &str) -> Option<String> {
        let captures = self.pattern.captures(file_name)?;
        let address = captures.get(1)?.as_str().trim();
        if address.is_empty() {
            None
        } else {
            Some(address.to_string())
        }
    }
}

/// First data file (sorted by path) whose name contains the address and,
/// when given, the marker. Both comparisons ignore case.
pub fn find_data_file(folder: &Path, address: &str, marker: Option<&str>) -> Option<PathBuf> {
    let address = address.to_lowercase();
    let marker = marker.map(str::to_lowercase);

    xlsx_files(folder).into_iter().find(|path| {
        let name = file_name_of(path).to_lowercase();
        name.contains(&address) && marker.as_deref().map_or(true, |m| name.contains(m))
    })
}

/// `<output>/<stem><suffix>.xlsx`
pub fn output_path_for(report: &Path, output_folder: &Path, suffix: &str) -> PathBuf {
    let stem = report
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_folder.join(format!("{}{}.{}", stem, suffix, XLSX_EXTENSION))
}

pub fn summary_file_name(now: DateTime<Local>) -> String {
    format!("Отчёт_об_обработке_{}.{}", now.format("%Y%m%d_%H%M%S"), XLSX_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn extractor() -> AddressExtractor {
        AddressExtractor::new(Regex::new(crate::config::DEFAULT_ADDRESS_PATTERN).unwrap())
    }

    #[test]
    fn test_extract_address() {
        let ex = extractor();
        assert_eq!(ex.extract("Акт (ул. Ленина, 1).xlsx").as_deref(), Some("ул. Ленина, 1"));
        assert_eq!(ex.extract("Акт ( пр. Мира, 5 ) копия.xlsx").as_deref(), Some("пр. Мира, 5"));
        assert_eq!(ex.extract("Акт без адреса.xlsx"), None);
        assert_eq!(ex.extract("Акт ( ).xlsx"), None);
    }

    #[test]
    fn test_output_path() {
        let out = output_path_for(Path::new("in/Акт (ул. Ленина, 1).xlsx"), Path::new("out"), "_FILLED");
        assert_eq!(out, Path::new("out").join("Акт (ул. Ленина, 1)_FILLED.xlsx"));
    }

    #[test]
    fn test_summary_file_name() {
        let when = Local.with_ymd_and_hms(2026, 10, 1, 9, 5, 7).unwrap();
        assert_eq!(summary_file_name(when), "Отчёт_об_обработке_20261001_090507.xlsx");
    }
}
