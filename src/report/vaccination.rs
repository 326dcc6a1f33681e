//! Vaccination compliance report
//!
//! One classifier invocation per (program, center, window). Centers are
//! independent of each other; the table is only written once every center
//! has classified cleanly, so an integrity failure never leaves a partial
//! report file behind.

use log::info;

use crate::algorithm::{ClassifierInput, ProgramPolicy, Roster, STATUS_ROWS, StatusSets, classify};
use crate::config::ReportingConfig;
use crate::error::{ReportingError, Result};
use crate::export::MissedRosterExporter;
use crate::models::VaccineProgram;
use crate::period::{DateRange, ReportingPeriod, flu_season_for};
use crate::report::ReportTable;
use crate::store::PopulationStore;
use crate::utils::paths;

/// Build, reconcile, and write one program's compliance report.
///
/// Influenza reports cover the flu season the quarter belongs to;
/// pneumococcal reports cover the quarter itself. The missed roster (and,
/// for pneumococcal, the operational follow-up roster) is exported per
/// center as part of the same pass.
pub fn vaccination_report(
    store: &dyn PopulationStore,
    config: &ReportingConfig,
    program: VaccineProgram,
    period: &ReportingPeriod,
) -> Result<ReportTable> {
    if !store.has_program_feed(program)? {
        return Err(ReportingError::MissingSourceData(format!(
            "no {program} event feed in the store"
        )));
    }

    let policy = ProgramPolicy::for_program(program);
    let window = match program {
        VaccineProgram::Influenza => flu_season_for(period)?,
        VaccineProgram::Pneumococcal => period.range,
    };

    info!("building {program} report for {period}, window {window}");

    let exporter = MissedRosterExporter::new(&config.output_root, period);
    let mut table = ReportTable::new("status", &STATUS_ROWS);

    for center in &config.centers {
        let sets = classify_center(store, program, center, &window, &policy)?;

        exporter.export(
            store,
            &format!("missed_{}_hpms", program.feed_name()),
            &sets.missed,
        )?;
        if program == VaccineProgram::Pneumococcal {
            // Operational follow-up drops participants who already refused
            // in a prior period; the regulatory roster keeps them.
            let refused_prior = store.refused_before(program, center, window.start)?;
            let missed_actual: Roster = sets.missed.difference(&refused_prior).cloned().collect();
            exporter.export(
                store,
                &format!("missed_{}_actual", program.feed_name()),
                &missed_actual,
            )?;
        }

        table.push_column(center, sets.counts().to_vec());
    }

    let path = paths::quarter_dir(&config.output_root, period).join(format!(
        "hpms_{}_Q{}_{}.csv",
        program.feed_name(),
        period.quarter,
        period.year
    ));
    table.write_csv(&path)?;
    info!("wrote {program} report to {}", path.display());

    if let Some(rates) = table.rate("received_during", "eligible") {
        for (center, rate) in rates {
            info!("{program} in-period coverage, {center}: {:.1}%", rate * 100.0);
        }
    }

    Ok(table)
}

fn classify_center(
    store: &dyn PopulationStore,
    program: VaccineProgram,
    center: &str,
    window: &DateRange,
    policy: &ProgramPolicy,
) -> Result<StatusSets> {
    let input = ClassifierInput {
        eligible: store.eligible_roster(center, window, policy.min_age)?,
        administered_in_window: store.administered_within(program, center, window)?,
        administered_before_window: store.administered_before(
            program,
            center,
            window.start,
            policy.lookback_horizon(window),
        )?,
        contraindicated: store.contraindicated(program, center)?,
        refused: store.refused_within(program, center, window)?,
    };
    classify(program, center, input)
}
