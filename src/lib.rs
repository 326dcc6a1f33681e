//! Per-period compliance statistics for a managed-care population.
//!
//! For a reporting quarter (or, for influenza, a flu season) every
//! enrolled, eligible participant at each service center is classified
//! into exactly one vaccination-status bucket, and enrollment census
//! counts are computed alongside. The output feeds regulatory filings
//! that must reconcile to the authoritative enrollment counts, so the
//! classifier checks its partition at runtime and a violation aborts
//! that report instead of emitting silently wrong numbers.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod period;
pub mod report;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
pub use algorithm::{ClassifierInput, ProgramPolicy, Roster, StatusSets, classify};
pub use config::ReportingConfig;
pub use error::{ReportingError, Result};
pub use export::MissedRosterExporter;
pub use models::VaccineProgram;
pub use period::{DateRange, ReportingPeriod};
pub use report::{ReportTable, RunSummary, run_quarterly_reports};
pub use store::{MemoryStore, PopulationStore, SqliteStore};
