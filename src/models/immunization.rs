//! Immunization event records

use std::fmt;

use chrono::NaiveDate;

use crate::models::ParticipantId;

/// Outcome code attached to an immunization event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseStatus {
    /// Participant or representative declined the dose
    Refused,
    /// Dose was administered
    Administered,
    /// Medically exempt, e.g. a documented allergy
    Contraindicated,
}

impl DoseStatus {
    /// Numeric code used by the reporting store
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Refused => 0,
            Self::Administered => 1,
            Self::Contraindicated => 99,
        }
    }

    /// Decode the store's numeric status code
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Refused),
            1 => Some(Self::Administered),
            99 => Some(Self::Contraindicated),
            _ => None,
        }
    }
}

/// Vaccine program a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaccineProgram {
    /// Pneumococcal vaccination, reported every quarter for the 65+ roster
    Pneumococcal,
    /// Influenza vaccination, reported per flu season
    Influenza,
}

impl VaccineProgram {
    /// Short name shared by the store's event table and report file names
    #[must_use]
    pub const fn feed_name(self) -> &'static str {
        match self {
            Self::Pneumococcal => "pneumo",
            Self::Influenza => "influ",
        }
    }
}

impl fmt::Display for VaccineProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pneumococcal => write!(f, "pneumococcal"),
            Self::Influenza => write!(f, "influenza"),
        }
    }
}

/// One immunization event as recorded in the store.
///
/// A participant may have zero, one, or many events per program; duplicate
/// administered rows are expected from data entry and collapse to a single
/// outcome during classification.
#[derive(Debug, Clone)]
pub struct ImmunizationEvent {
    /// Enrollment system identifier
    pub member_id: ParticipantId,
    /// Program this event belongs to
    pub program: VaccineProgram,
    /// Administration date; some sources record refusals without one
    pub date_administered: Option<NaiveDate>,
    /// Recorded outcome
    pub dose_status: DoseStatus,
}
