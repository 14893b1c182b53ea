//! Process configuration from command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::reports::ReportSettings;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Bookstore inventory service", long_about = None)]
/// Command-line arguments for the bookstore server.
pub struct Config {
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    #[arg(long, default_value = "data/books.json")]
    pub books: PathBuf,
    #[arg(long, default_value = "data/authors.json")]
    pub authors: PathBuf,
    #[arg(long, default_value = "data/customers.json")]
    pub customers: PathBuf,
    #[arg(long, default_value = "data/orders.json")]
    pub orders: PathBuf,
    #[arg(long, default_value = "data/reports.json")]
    pub reports: PathBuf,
    /// Directory for rotating log files. Relative paths resolve against the working directory.
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"], default_value_t = String::from("info"))]
    pub log_level: String,
    /// Directory receiving one JSON file per generated sales report.
    #[arg(long, default_value = "reports")]
    pub reports_dir: PathBuf,
    #[arg(long, default_value_t = 1440)]
    pub report_interval_secs: u64,
    #[arg(long, default_value_t = 24)]
    pub report_window_hours: i64,
}

impl Config {
    /// Keep every store file and output directory under `dir`.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            port: 0,
            books: dir.join("books.json"),
            authors: dir.join("authors.json"),
            customers: dir.join("customers.json"),
            orders: dir.join("orders.json"),
            reports: dir.join("reports.json"),
            log_dir: dir.join("logs"),
            log_level: "info".to_string(),
            reports_dir: dir.join("reports"),
            report_interval_secs: 1440,
            report_window_hours: 24,
        }
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            window: chrono::Duration::hours(self.report_window_hours),
            output_dir: self.reports_dir.clone(),
            ..ReportSettings::default()
        }
    }
}
