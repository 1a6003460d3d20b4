//! FILENAME: app/src/lib.rs
// PURPOSE: Batch entry point: startup, roster loading, the parallel fill run
// and the summary workbook.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use filler::RosterSource;
use log::{info, warn};
use persistence::{load_roster, write_summary, SummaryRow};

pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod logging;

pub use batch::{Batch, DocumentError, DocumentReport, SUCCESS_MESSAGE, UNKNOWN_ADDRESS};
pub use cli::{Cli, LogLevel};
pub use config::{AppConfig, AppConfigError};
pub use discovery::{find_data_file, output_path_for, scan_reports, summary_file_name, AddressExtractor};
pub use logging::{get_log_path, init_log_file, init_logging, next_seq, sort_log_file, write_log};

/// Totals of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub summary_path: PathBuf,
}

fn required(path: &Option<PathBuf>, what: &str) -> Result<PathBuf> {
    path.clone()
        .ok_or_else(|| anyhow!("{} is not set (use the config file or the command line)", what))
}

/// Loads the roster when both tables are configured. A roster that fails to
/// load is reported and the batch goes on without it.
fn load_roster_source(config: &AppConfig) -> Option<Box<dyn RosterSource>> {
    match (&config.commission_types_file, &config.address_map_file) {
        (Some(types), Some(map)) => match load_roster(types, map, &config.roster_columns) {
            Ok(table) => Some(Box::new(table)),
            Err(e) => {
                warn!("roster not loaded, continuing without it: {}", e);
                None
            }
        },
        (None, None) => {
            info!("no roster configured");
            None
        }
        _ => {
            warn!("roster needs both the commission types and the address map file; continuing without it");
            None
        }
    }
}

/// Runs one batch with an already validated config.
pub fn run_batch(config: &AppConfig) -> Result<RunSummary> {
    let reports_folder = required(&config.reports_folder, "reports folder")?;
    let data_folder = required(&config.data_folder, "data folder")?;
    let output_folder = required(&config.output_folder, "output folder")?;

    for (folder, what) in [(&reports_folder, "reports folder"), (&data_folder, "data folder")] {
        if !folder.is_dir() {
            bail!("{} {} does not exist or is not a directory", what, folder.display());
        }
    }

    std::fs::create_dir_all(&output_folder)
        .with_context(|| format!("cannot create output folder {}", output_folder.display()))?;

    let roster = load_roster_source(config);
    let batch = Batch::new(config, data_folder, output_folder.clone(), roster)?;

    let reports = scan_reports(&reports_folder, &config.output_suffix);
    if reports.is_empty() {
        warn!("no reports found in {}", reports_folder.display());
    }
    info!("processing {} report(s)", reports.len());

    let results = batch.process_all(&reports);
    let rows: Vec<SummaryRow> = results.iter().map(DocumentReport::to_summary_row).collect();
    let succeeded = results.iter().filter(|r| r.is_success()).count();

    let summary_path = output_folder.join(summary_file_name(chrono::Local::now()));
    write_summary(&rows, &summary_path)
        .with_context(|| format!("cannot write summary {}", summary_path.display()))?;
    info!(
        "done: {} of {} report(s) filled, summary at {}",
        succeeded,
        results.len(),
        summary_path.display()
    );

    Ok(RunSummary { processed: results.len(), succeeded, summary_path })
}

/// Binary entry point.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.to_filter(), cli.log_file.as_deref());

    let mut config = match &cli.config {
        Some(path) => {
            AppConfig::load(path).with_context(|| format!("cannot load config {}", path.display()))?
        }
        None => AppConfig::default(),
    };
    config.apply_cli(&cli);
    config.validate().context("invalid configuration")?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("cannot configure worker threads")?;
    }

    let outcome = run_batch(&config);

    if get_log_path().is_some() {
        if let Err(e) = sort_log_file() {
            eprintln!("[LOG] could not sort log file: {}", e);
        }
    }

    outcome.map(|_| ())
}
