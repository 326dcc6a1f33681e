//! Missed-roster export
//!
//! The nursing teams work from these lists between report runs, so a
//! re-run within the same period must merge with whatever was exported
//! before: never overwrite it and never duplicate a participant. Rows
//! are keyed by member id; a fresh export wins for an id that is already
//! present, since enrollment fields may have been corrected between
//! partial runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::algorithm::Roster;
use crate::error::Result;
use crate::period::ReportingPeriod;
use crate::store::{PopulationStore, RosterRow};
use crate::utils::paths;

/// Writes follow-up rosters for one reporting period
#[derive(Debug)]
pub struct MissedRosterExporter {
    out_dir: PathBuf,
}

impl MissedRosterExporter {
    /// Exporter targeting the period's `missed_vacc` directory
    #[must_use]
    pub fn new(output_root: &Path, period: &ReportingPeriod) -> Self {
        Self {
            out_dir: paths::missed_vacc_dir(output_root, period),
        }
    }

    /// Merge a roster into `<name>.csv`, deduplicating on member id.
    ///
    /// The merge is a single read followed by a full rewrite of one file
    /// per roster name; callers run exports sequentially within a period.
    pub fn export(&self, store: &dyn PopulationStore, name: &str, roster: &Roster) -> Result<()> {
        let path = self.out_dir.join(format!("{name}.csv"));

        let mut rows: BTreeMap<String, RosterRow> = BTreeMap::new();
        if path.exists() {
            let mut reader = csv::Reader::from_path(&path)?;
            for row in reader.deserialize::<RosterRow>() {
                let row = row?;
                rows.insert(row.member_id.clone(), row);
            }
        }

        for row in store.participant_details(roster)? {
            rows.insert(row.member_id.clone(), row);
        }

        fs::create_dir_all(&self.out_dir)?;
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows.values() {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(
            "exported {} participants to {}",
            rows.len(),
            path.display()
        );
        Ok(())
    }
}
