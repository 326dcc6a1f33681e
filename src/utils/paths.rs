//! Report directory layout
//!
//! Reports land under `<output_root>/<year>Q<quarter>/`, with the
//! follow-up rosters in a `missed_vacc` subdirectory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::period::ReportingPeriod;

/// Directory holding one quarter's report files
#[must_use]
pub fn quarter_dir(output_root: &Path, period: &ReportingPeriod) -> PathBuf {
    output_root.join(period.key())
}

/// Directory holding one quarter's follow-up rosters
#[must_use]
pub fn missed_vacc_dir(output_root: &Path, period: &ReportingPeriod) -> PathBuf {
    quarter_dir(output_root, period).join("missed_vacc")
}

/// Create the period's directory tree if it is not already there
pub fn ensure_report_dirs(output_root: &Path, period: &ReportingPeriod) -> Result<()> {
    fs::create_dir_all(missed_vacc_dir(output_root, period))?;
    Ok(())
}
