//! Read-only access to the reporting population
//!
//! The classification core consumes a handful of distinct-identifier
//! lookups; how they are answered is a storage detail behind this trait.
//! The production adapter reads the SQLite reporting database; tests use
//! the in-memory store. A store instance is passed into the reporting
//! entry points explicitly and lives for one run.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithm::Roster;
use crate::error::Result;
use crate::models::{PayerGroup, VaccineProgram};
use crate::period::DateRange;

/// One row of a follow-up roster export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Enrollment system identifier
    pub member_id: String,
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
    /// First day of enrollment
    pub enrollment_date: NaiveDate,
    /// Last day of enrollment, when the interval has closed
    pub disenrollment_date: Option<NaiveDate>,
}

/// Read-only lookups over enrollment intervals, demographics, and
/// immunization events.
///
/// All identifier-returning queries are distinct, and date comparisons are
/// inclusive unless stated otherwise.
pub trait PopulationStore {
    /// Distinct participants enrolled at the center for any part of the
    /// window. With `min_age`, only participants at least that old at
    /// their reference date (disenrollment date if set, else the window
    /// end); participants without a demographic record are excluded when
    /// an age floor applies.
    fn eligible_roster(
        &self,
        center: &str,
        range: &DateRange,
        min_age: Option<u32>,
    ) -> Result<Roster>;

    /// Distinct participants with an administered event dated inside the
    /// window. Undated events never count.
    fn administered_within(
        &self,
        program: VaccineProgram,
        center: &str,
        window: &DateRange,
    ) -> Result<Roster>;

    /// Distinct participants with an administered event dated strictly
    /// before `cutoff`, and no earlier than `horizon` when one is given.
    fn administered_before(
        &self,
        program: VaccineProgram,
        center: &str,
        cutoff: NaiveDate,
        horizon: Option<NaiveDate>,
    ) -> Result<Roster>;

    /// Distinct participants with a contraindicated-status event on file.
    /// No date constraint; the flag is permanent.
    fn contraindicated(&self, program: VaccineProgram, center: &str) -> Result<Roster>;

    /// Distinct participants with a refusal dated inside the window, or
    /// recorded without a date.
    fn refused_within(
        &self,
        program: VaccineProgram,
        center: &str,
        window: &DateRange,
    ) -> Result<Roster>;

    /// Distinct participants with a refusal dated strictly before `cutoff`
    fn refused_before(
        &self,
        program: VaccineProgram,
        center: &str,
        cutoff: NaiveDate,
    ) -> Result<Roster>;

    /// Identity and enrollment fields for a roster, for follow-up exports
    fn participant_details(&self, ids: &Roster) -> Result<Vec<RosterRow>>;

    /// Whether the program's event feed is present in the store
    fn has_program_feed(&self, program: VaccineProgram) -> Result<bool>;

    /// Enrollment rows overlapping the window; all centers when `center`
    /// is `None` (used for reconciliation)
    fn census_count(&self, center: Option<&str>, range: &DateRange) -> Result<usize>;

    /// Enrollment rows whose enrollment date falls inside the window
    fn enrolled_count(
        &self,
        center: Option<&str>,
        range: &DateRange,
        payer: PayerGroup,
    ) -> Result<usize>;

    /// Enrollment rows whose disenrollment date falls inside the window
    fn disenrolled_count(
        &self,
        center: Option<&str>,
        range: &DateRange,
        payer: PayerGroup,
    ) -> Result<usize>;

    /// Disenrollments inside the window recorded as deaths
    fn death_count(&self, center: Option<&str>, range: &DateRange) -> Result<usize>;
}
