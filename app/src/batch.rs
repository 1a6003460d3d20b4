//! FILENAME: app/src/batch.rs
// PURPOSE: Processes every report template of a run and collects one report
// per document for the summary.
// CONTEXT: Each document is independent: its own workbook, Grid and field set.
// Workers share only the immutable engine, config and roster.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use filler::{FieldValues, FillResult, ReportFillEngine, RosterSource};
use log::{error, info, warn};
use persistence::{read_field_values, PersistenceError, SummaryRow, TemplateDocument};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::{AppConfig, AppConfigError};
use crate::discovery::{find_data_file, output_path_for, AddressExtractor};

pub const UNKNOWN_ADDRESS: &str = "Неизвестен";
pub const SUCCESS_MESSAGE: &str = "Отчёт успешно заполнен";

/// Why a document could not be filled. Messages go into the summary as is.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Не удалось извлечь адрес из имени файла")]
    AddressNotFound,

    #[error("Не найден файл данных для адреса '{address}'")]
    UpstreamDataMissing { address: String },

    #[error("Ошибка чтения файла данных: {0}")]
    DataSource(#[source] PersistenceError),

    #[error("Ошибка обработки отчёта: {0}")]
    DocumentIo(#[source] PersistenceError),

    #[error("Внутренняя ошибка при обработке отчёта: {0}")]
    Panicked(String),
}

/// Outcome of one document.
#[derive(Debug)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub address: Option<String>,
    pub output: Option<PathBuf>,
    pub result: FillResult,
    pub error: Option<DocumentError>,
}

impl DocumentReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.result.is_success()
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn to_summary_row(&self) -> SummaryRow {
        SummaryRow {
            file: self.file_name(),
            address: self.address.clone().unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            success: self.is_success(),
            message: match &self.error {
                Some(e) => e.to_string(),
                None => SUCCESS_MESSAGE.to_string(),
            },
            filled_count: self.result.filled_count,
            missing_fields: self.result.missing_fields.clone(),
            condition: self.result.condition,
            conflicts: self
                .result
                .conflicts
                .iter()
                .map(|(field, reason)| format!("{}: {}", field, reason))
                .collect(),
        }
    }
}

/// A failure together with the fields the document was meant to receive.
struct Failure {
    error: DocumentError,
    intended: Vec<String>,
    condition: bool,
}

impl Failure {
    fn before_fields(error: DocumentError) -> Self {
        Failure { error, intended: Vec::new(), condition: false }
    }
}

pub struct Batch {
    engine: ReportFillEngine,
    addresses: AddressExtractor,
    data_file_marker: Option<String>,
    output_suffix: String,
    roster: Option<Box<dyn RosterSource>>,
    data_folder: PathBuf,
    output_folder: PathBuf,
}

impl Batch {
    pub fn new(
        config: &AppConfig,
        data_folder: PathBuf,
        output_folder: PathBuf,
        roster: Option<Box<dyn RosterSource>>,
    ) -> Result<Self, AppConfigError> {
        Ok(Batch {
            engine: ReportFillEngine::new(config.fill.clone()),
            addresses: AddressExtractor::new(config.address_regex()?),
            data_file_marker: config.data_file_marker.clone(),
            output_suffix: config.output_suffix.clone(),
            roster,
            data_folder,
            output_folder,
        })
    }

    /// Processes documents in parallel. Reports come back in input order.
    /// A panic while handling one document fails only that document.
    pub fn process_all(&self, reports: &[PathBuf]) -> Vec<DocumentReport> {
        reports
            .par_iter()
            .map(|report| {
                let address = report
                    .file_name()
                    .and_then(|n| self.addresses.extract(&n.to_string_lossy()));
                isolate_document(report, address, || self.process_document(report))
            })
            .collect()
    }

    pub fn process_document(&self, report: &Path) -> DocumentReport {
        let file_name = report
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(target: "BATCH", "processing {}", file_name);

        let address = self.addresses.extract(&file_name);
        let outcome = match &address {
            Some(address) => self.fill_document(report, address),
            None => Err(Failure::before_fields(DocumentError::AddressNotFound)),
        };

        match outcome {
            Ok((output, result)) => {
                info!(
                    target: "BATCH",
                    "{}: {} field(s) filled, {} missing, {} conflict(s)",
                    file_name,
                    result.filled_count,
                    result.missing_fields.len(),
                    result.conflicts.len()
                );
                DocumentReport { source: report.to_path_buf(), address, output: Some(output), result, error: None }
            }
            Err(failure) => {
                error!(target: "BATCH", "{}: {}", file_name, failure.error);
                let mut result = FillResult::failed(failure.intended);
                result.condition = failure.condition;
                DocumentReport {
                    source: report.to_path_buf(),
                    address,
                    output: None,
                    result,
                    error: Some(failure.error),
                }
            }
        }
    }

    fn fill_document(&self, report: &Path, address: &str) -> Result<(PathBuf, FillResult), Failure> {
        let data_file = find_data_file(&self.data_folder, address, self.data_file_marker.as_deref()).ok_or_else(
            || Failure::before_fields(DocumentError::UpstreamDataMissing { address: address.to_string() }),
        )?;
        info!(target: "BATCH", "data file for '{}': {}", address, data_file.display());

        let data: FieldValues = read_field_values(&data_file)
            .map_err(|e| Failure::before_fields(DocumentError::DataSource(e)))?;
        if data.is_empty() {
            warn!(target: "BATCH", "{} holds no field values", data_file.display());
        }

        let mut document = TemplateDocument::open(report).map_err(|e| Failure {
            error: DocumentError::DocumentIo(e),
            intended: data.names(),
            condition: false,
        })?;

        let (fields, result) = self.engine.run(document.grid_mut(), &data, self.roster.as_deref(), address);

        let output = output_path_for(report, &self.output_folder, &self.output_suffix);
        document.save(&output).map_err(|e| Failure {
            error: DocumentError::DocumentIo(e),
            intended: fields.names(),
            condition: result.condition,
        })?;
        info!(target: "BATCH", "saved {}", output.display());

        Ok((output, result))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `work` for one document and turns a panic into a failed report.
pub fn isolate_document<F>(report: &Path, address: Option<String>, work: F) -> DocumentReport
where
    F: FnOnce() -> DocumentReport,
{
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(document) => document,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(target: "BATCH", "{}: panicked: {}", report.display(), message);
            DocumentReport {
                source: report.to_path_buf(),
                address,
                output: None,
                result: FillResult::failed(Vec::new()),
                error: Some(DocumentError::Panicked(message)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filler::FillStatus;
    use std::collections::BTreeMap;

    fn success_report() -> DocumentReport {
        let mut conflicts = BTreeMap::new();
        conflicts.insert("Дата".to_string(), "C13 already contains '01.10.2026'".to_string());
        DocumentReport {
            source: PathBuf::from("in/Акт (ул. Ленина, 1).xlsx"),
            address: Some("ул. Ленина, 1".to_string()),
            output: Some(PathBuf::from("out/Акт (ул. Ленина, 1)_FILLED.xlsx")),
            result: FillResult {
                status: FillStatus::Success,
                filled_count: 2,
                missing_fields: vec!["Площадь".to_string()],
                conflicts,
                condition: true,
                inserted_rows_at: Some(10),
                outcomes: Vec::new(),
            },
            error: None,
        }
    }

    #[test]
    fn test_success_row() {
        let row = success_report().to_summary_row();
        assert!(row.success);
        assert_eq!(row.file, "Акт (ул. Ленина, 1).xlsx");
        assert_eq!(row.message, SUCCESS_MESSAGE);
        assert_eq!(row.filled_count, 2);
        assert!(row.condition);
        assert_eq!(row.conflicts, vec!["Дата: C13 already contains '01.10.2026'".to_string()]);
    }

    #[test]
    fn test_failure_row() {
        let report = DocumentReport {
            source: PathBuf::from("Акт без адреса.xlsx"),
            address: None,
            output: None,
            result: FillResult::failed(Vec::new()),
            error: Some(DocumentError::AddressNotFound),
        };
        let row = report.to_summary_row();
        assert!(!row.success);
        assert_eq!(row.address, UNKNOWN_ADDRESS);
        assert_eq!(row.message, "Не удалось извлечь адрес из имени файла");
        assert_eq!(row.status_label(), "Ошибка");
    }

    #[test]
    fn test_panic_fails_only_its_document() {
        let report = Path::new("Акт (ул. Ленина, 1).xlsx");
        let failed = isolate_document(report, Some("ул. Ленина, 1".to_string()), || {
            panic!("broken shared strings table")
        });
        assert!(!failed.is_success());
        assert!(matches!(&failed.error, Some(DocumentError::Panicked(m)) if m == "broken shared strings table"));
        let row = failed.to_summary_row();
        assert_eq!(row.address, "ул. Ленина, 1");
        assert_eq!(row.message, "Внутренняя ошибка при обработке отчёта: broken shared strings table");

        let fine = isolate_document(report, None, success_report);
        assert!(fine.is_success());
    }

    #[test]
    fn test_missing_data_message_names_address() {
        let err = DocumentError::UpstreamDataMissing { address: "пр. Мира, 5".to_string() };
        assert_eq!(err.to_string(), "Не найден файл данных для адреса 'пр. Мира, 5'");
    }
}
