use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "formfill",
    version,
    about = "Fills spreadsheet report templates from per-address data files"
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Folder with report templates (searched recursively)
    #[arg(long)]
    pub reports: Option<PathBuf>,

    /// Folder with per-address data files (searched recursively)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Folder receiving filled reports and the processing summary
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Commission types table (region, utility flag, one column per role)
    #[arg(long = "roster-types")]
    pub roster_types: Option<PathBuf>,

    /// Address to region map
    #[arg(long = "address-map")]
    pub address_map: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also append log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
