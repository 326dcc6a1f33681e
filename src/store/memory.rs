//! In-memory population store
//!
//! Vector-backed implementation of the store contract, used by tests and
//! small fixture runs. Semantics match the SQLite adapter: distinct
//! results, inclusive date ranges, and center membership via the
//! enrollment table.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::algorithm::Roster;
use crate::error::Result;
use crate::models::{
    DemographicRecord, DisenrollReason, DoseStatus, EnrollmentInterval, ImmunizationEvent,
    Participant, ParticipantId, PayerGroup, VaccineProgram,
};
use crate::period::DateRange;
use crate::store::{PopulationStore, RosterRow};

/// A population store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    enrollment: Vec<EnrollmentInterval>,
    demographics: FxHashMap<ParticipantId, NaiveDate>,
    participants: FxHashMap<ParticipantId, Participant>,
    events: Vec<ImmunizationEvent>,
    feeds: Vec<VaccineProgram>,
}

impl MemoryStore {
    /// Create an empty store with no event feeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enrollment interval
    pub fn add_enrollment(&mut self, interval: EnrollmentInterval) {
        self.enrollment.push(interval);
    }

    /// Add a date-of-birth record
    pub fn add_demographic(&mut self, record: DemographicRecord) {
        self.demographics.insert(record.member_id, record.dob);
    }

    /// Add participant identity fields
    pub fn add_participant(&mut self, participant: Participant) {
        self.participants
            .insert(participant.member_id.clone(), participant);
    }

    /// Add an immunization event; the program's feed becomes present
    pub fn add_event(&mut self, event: ImmunizationEvent) {
        self.enable_feed(event.program);
        self.events.push(event);
    }

    /// Mark a program's feed as present even without events
    pub fn enable_feed(&mut self, program: VaccineProgram) {
        if !self.feeds.contains(&program) {
            self.feeds.push(program);
        }
    }

    fn enrolled_at_center(&self, member_id: &str, center: &str) -> bool {
        self.enrollment
            .iter()
            .any(|e| e.member_id == member_id && e.center == center)
    }

    fn event_roster<F>(&self, program: VaccineProgram, center: &str, predicate: F) -> Roster
    where
        F: Fn(&ImmunizationEvent) -> bool,
    {
        self.events
            .iter()
            .filter(|e| e.program == program && predicate(e))
            .filter(|e| self.enrolled_at_center(&e.member_id, center))
            .map(|e| e.member_id.clone())
            .collect()
    }

    fn interval_count<F>(&self, center: Option<&str>, payer: PayerGroup, predicate: F) -> usize
    where
        F: Fn(&EnrollmentInterval) -> bool,
    {
        self.enrollment
            .iter()
            .filter(|e| center.is_none_or(|c| e.center == c))
            .filter(|e| payer.matches(e.medicare, e.medicaid))
            .filter(|e| predicate(e))
            .count()
    }
}

impl PopulationStore for MemoryStore {
    fn eligible_roster(
        &self,
        center: &str,
        range: &DateRange,
        min_age: Option<u32>,
    ) -> Result<Roster> {
        let roster = self
            .enrollment
            .iter()
            .filter(|e| e.center == center && e.covers(range))
            .filter(|e| match min_age {
                None => true,
                Some(min) => self.demographics.get(&e.member_id).is_some_and(|dob| {
                    e.age_reference(range.end)
                        .years_since(*dob)
                        .is_some_and(|age| age >= min)
                }),
            })
            .map(|e| e.member_id.clone())
            .collect();
        Ok(roster)
    }

    fn administered_within(
        &self,
        program: VaccineProgram,
        center: &str,
        window: &DateRange,
    ) -> Result<Roster> {
        Ok(self.event_roster(program, center, |e| {
            e.dose_status == DoseStatus::Administered
                && e.date_administered.is_some_and(|d| window.contains(&d))
        }))
    }

    fn administered_before(
        &self,
        program: VaccineProgram,
        center: &str,
        cutoff: NaiveDate,
        horizon: Option<NaiveDate>,
    ) -> Result<Roster> {
        Ok(self.event_roster(program, center, |e| {
            e.dose_status == DoseStatus::Administered
                && e.date_administered
                    .is_some_and(|d| d < cutoff && horizon.is_none_or(|h| d >= h))
        }))
    }

    fn contraindicated(&self, program: VaccineProgram, center: &str) -> Result<Roster> {
        Ok(self.event_roster(program, center, |e| {
            e.dose_status == DoseStatus::Contraindicated
        }))
    }

    fn refused_within(
        &self,
        program: VaccineProgram,
        center: &str,
        window: &DateRange,
    ) -> Result<Roster> {
        Ok(self.event_roster(program, center, |e| {
            e.dose_status == DoseStatus::Refused
                && e.date_administered.is_none_or(|d| window.contains(&d))
        }))
    }

    fn refused_before(
        &self,
        program: VaccineProgram,
        center: &str,
        cutoff: NaiveDate,
    ) -> Result<Roster> {
        Ok(self.event_roster(program, center, |e| {
            e.dose_status == DoseStatus::Refused
                && e.date_administered.is_some_and(|d| d < cutoff)
        }))
    }

    fn participant_details(&self, ids: &Roster) -> Result<Vec<RosterRow>> {
        let mut details = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(participant) = self.participants.get(id) else {
                continue;
            };
            // Latest interval wins when a participant re-enrolled
            let Some(interval) = self
                .enrollment
                .iter()
                .filter(|e| &e.member_id == id)
                .max_by_key(|e| e.enrollment_date)
            else {
                continue;
            };
            details.push(RosterRow {
                member_id: id.clone(),
                first: participant.first.clone(),
                last: participant.last.clone(),
                enrollment_date: interval.enrollment_date,
                disenrollment_date: interval.disenrollment_date,
            });
        }
        Ok(details)
    }

    fn has_program_feed(&self, program: VaccineProgram) -> Result<bool> {
        Ok(self.feeds.contains(&program))
    }

    fn census_count(&self, center: Option<&str>, range: &DateRange) -> Result<usize> {
        Ok(self.interval_count(center, PayerGroup::All, |e| e.covers(range)))
    }

    fn enrolled_count(
        &self,
        center: Option<&str>,
        range: &DateRange,
        payer: PayerGroup,
    ) -> Result<usize> {
        Ok(self.interval_count(center, payer, |e| range.contains(&e.enrollment_date)))
    }

    fn disenrolled_count(
        &self,
        center: Option<&str>,
        range: &DateRange,
        payer: PayerGroup,
    ) -> Result<usize> {
        Ok(self.interval_count(center, payer, |e| {
            e.disenrollment_date.is_some_and(|d| range.contains(&d))
        }))
    }

    fn death_count(&self, center: Option<&str>, range: &DateRange) -> Result<usize> {
        Ok(self.interval_count(center, PayerGroup::All, |e| {
            e.disenroll_reason == Some(DisenrollReason::Deceased)
                && e.disenrollment_date.is_some_and(|d| range.contains(&d))
        }))
    }
}
