//! Enrollment census report
//!
//! Twelve fixed rows per center: the point-in-period census, enrollments
//! and disenrollments with their payer-mix breakdowns, and deaths. The
//! Total column must reconcile with independently computed population-wide
//! counts before the file is written; these numbers are the ones the
//! other reports must agree with.

use log::info;

use crate::config::ReportingConfig;
use crate::error::{ReportingError, Result};
use crate::models::PayerGroup;
use crate::period::{DateRange, ReportingPeriod};
use crate::report::ReportTable;
use crate::store::PopulationStore;
use crate::utils::paths;

/// Census row labels, in emission order. The payer breakdown repeats under
/// both the Enrolled and Disenrolled headings.
pub const CENSUS_ROWS: [&str; 12] = [
    "Census",
    "Enrolled",
    "Dual",
    "Medicare",
    "Medicaid",
    "Private Pay",
    "Disenrolled",
    "Dual",
    "Medicare",
    "Medicaid",
    "Private Pay",
    "Deaths",
];

// Indices of the reconciled rows in CENSUS_ROWS
const ROW_CENSUS: usize = 0;
const ROW_ENROLLED: usize = 1;
const ROW_DISENROLLED: usize = 6;
const ROW_DEATHS: usize = 11;

/// Build, reconcile, and write the enrollment census report
pub fn enrollment_report(
    store: &dyn PopulationStore,
    config: &ReportingConfig,
    period: &ReportingPeriod,
) -> Result<ReportTable> {
    let range = &period.range;
    info!("building enrollment census for {period}");

    let mut table = ReportTable::new("category", &CENSUS_ROWS);
    for center in &config.centers {
        table.push_column(center, center_counts(store, center, range)?);
    }

    reconcile(store, &table, range)?;

    let path = paths::quarter_dir(&config.output_root, period).join(format!(
        "hpms_enrollment_Q{}_{}.csv",
        period.quarter, period.year
    ));
    table.write_csv(&path)?;
    info!("wrote enrollment census to {}", path.display());

    Ok(table)
}

fn center_counts(
    store: &dyn PopulationStore,
    center: &str,
    range: &DateRange,
) -> Result<Vec<usize>> {
    let center = Some(center);
    let mut counts = Vec::with_capacity(CENSUS_ROWS.len());

    counts.push(store.census_count(center, range)?);

    counts.push(store.enrolled_count(center, range, PayerGroup::All)?);
    for payer in PayerGroup::BREAKDOWN {
        counts.push(store.enrolled_count(center, range, payer)?);
    }

    counts.push(store.disenrolled_count(center, range, PayerGroup::All)?);
    for payer in PayerGroup::BREAKDOWN {
        counts.push(store.disenrolled_count(center, range, payer)?);
    }

    counts.push(store.death_count(center, range)?);
    Ok(counts)
}

/// Check the Total column against population-wide counts computed without
/// the per-center split. A disagreement means a center assignment or
/// date predicate drifted, and the report must not go out.
fn reconcile(store: &dyn PopulationStore, table: &ReportTable, range: &DateRange) -> Result<()> {
    let totals = table.totals();
    let checks = [
        (ROW_CENSUS, "Census", store.census_count(None, range)?),
        (
            ROW_ENROLLED,
            "Enrolled",
            store.enrolled_count(None, range, PayerGroup::All)?,
        ),
        (
            ROW_DISENROLLED,
            "Disenrolled",
            store.disenrolled_count(None, range, PayerGroup::All)?,
        ),
        (ROW_DEATHS, "Deaths", store.death_count(None, range)?),
    ];

    for (idx, label, expected) in checks {
        if totals[idx] != expected {
            return Err(ReportingError::CensusMismatch(format!(
                "{label}: center columns sum to {}, population-wide count is {expected}",
                totals[idx]
            )));
        }
    }
    Ok(())
}
