//! Run configuration

use std::path::PathBuf;

/// Configuration for one reporting run
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// Path to the SQLite reporting database
    pub database_path: PathBuf,
    /// Root directory for report files
    pub output_root: PathBuf,
    /// Service centers reported as columns, in column order
    pub centers: Vec<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("reporting.db"),
            output_root: PathBuf::from("report_files"),
            centers: vec![
                "Providence".to_string(),
                "Woonsocket".to_string(),
                "Westerly".to_string(),
            ],
        }
    }
}
