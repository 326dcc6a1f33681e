//! Domain records for the reporting population
//!
//! These models mirror what the reporting store holds: enrollment intervals,
//! demographic records, and immunization events. The core classification
//! only ever reads them; ingestion happens upstream of this crate.

pub mod enrollment;
pub mod immunization;
pub mod participant;

pub use enrollment::{DisenrollReason, EnrollmentInterval, PayerGroup};
pub use immunization::{DoseStatus, ImmunizationEvent, VaccineProgram};
pub use participant::{DemographicRecord, Participant, ParticipantId};
