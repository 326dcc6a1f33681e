//! Report assembly and emission
//!
//! Each report unit (the enrollment census, and one table per vaccine
//! program) is built, reconciled, and written independently. The run
//! wrapper here enforces the isolation policy: the census is required,
//! vaccine programs degrade or fail on their own without stopping each
//! other.

pub mod enrollment;
pub mod table;
pub mod vaccination;

pub use enrollment::{CENSUS_ROWS, enrollment_report};
pub use table::ReportTable;
pub use vaccination::vaccination_report;

use log::{error, warn};

use crate::config::ReportingConfig;
use crate::error::{ReportingError, Result};
use crate::models::VaccineProgram;
use crate::period::ReportingPeriod;
use crate::store::PopulationStore;
use crate::utils::paths;

/// Outcome of one reporting run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Reports written successfully
    pub completed: Vec<String>,
    /// Optional feeds that were absent and skipped
    pub skipped: Vec<String>,
    /// Reports that failed, with their errors
    pub failed: Vec<(String, ReportingError)>,
}

impl RunSummary {
    /// Whether every attempted report completed
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every report for one period: the enrollment census (required),
/// pneumococcal, and influenza for Q4 and Q1.
///
/// A failure in one vaccine program is recorded and does not stop the
/// others; a missing optional feed is skipped with a warning. A census
/// failure is fatal for the whole run, since the other reports must
/// reconcile against it.
pub fn run_quarterly_reports(
    store: &dyn PopulationStore,
    config: &ReportingConfig,
    period: &ReportingPeriod,
) -> Result<RunSummary> {
    paths::ensure_report_dirs(&config.output_root, period)?;

    let mut summary = RunSummary::default();

    enrollment_report(store, config, period)?;
    summary.completed.push("enrollment".to_string());

    let mut programs = vec![VaccineProgram::Pneumococcal];
    if period.in_flu_season() {
        programs.push(VaccineProgram::Influenza);
    }

    for program in programs {
        match vaccination_report(store, config, program, period) {
            Ok(_) => summary.completed.push(program.to_string()),
            Err(ReportingError::MissingSourceData(detail)) => {
                warn!("skipping {program} report: {detail}");
                summary.skipped.push(program.to_string());
            }
            Err(err) => {
                error!("{program} report failed: {err}");
                summary.failed.push((program.to_string(), err));
            }
        }
    }

    Ok(summary)
}
