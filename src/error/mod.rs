//! Error handling for the reporting pipeline.

use crate::models::VaccineProgram;

/// Errors that can occur while generating reports
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    /// A supplied quarter or year does not describe a reportable period
    #[error("invalid reporting period: {0}")]
    InvalidPeriod(String),

    /// The status reconciliation invariant was violated for one center/program
    #[error("data integrity check failed for {program} at {center}: {detail}")]
    DataIntegrity {
        /// Vaccine program whose report failed the check
        program: VaccineProgram,
        /// Service center whose counts failed to reconcile
        center: String,
        /// Which invariant failed and how
        detail: String,
    },

    /// Census totals disagree with the population-wide counts
    #[error("census reconciliation failed: {0}")]
    CensusMismatch(String),

    /// An expected source table or feed is absent
    #[error("missing source data: {0}")]
    MissingSourceData(String),

    /// Error querying the reporting store
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A date column in the store failed to parse
    #[error("malformed date in store: {0}")]
    MalformedDate(#[from] chrono::ParseError),

    /// Error reading or writing a report file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error opening or creating a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reporting operations
pub type Result<T> = std::result::Result<T, ReportingError>;
