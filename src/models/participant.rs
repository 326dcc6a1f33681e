//! Participant identity and demographics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a participant by the enrollment system
pub type ParticipantId = String;

/// Identity fields joined back onto rosters for follow-up lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Enrollment system identifier
    pub member_id: ParticipantId,
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
}

/// Date-of-birth record for a participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemographicRecord {
    /// Enrollment system identifier
    pub member_id: ParticipantId,
    /// Date of birth
    pub dob: NaiveDate,
}

impl DemographicRecord {
    /// Age in whole years at the reference date, floor semantics.
    ///
    /// `None` when the reference date precedes the date of birth.
    #[must_use]
    pub fn age_at(&self, reference: &NaiveDate) -> Option<u32> {
        reference.years_since(self.dob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_floors_to_whole_years() {
        let record = DemographicRecord {
            member_id: "1001".to_string(),
            dob: NaiveDate::from_ymd_opt(1960, 6, 15).unwrap(),
        };

        // Day before the 65th birthday
        assert_eq!(
            record.age_at(&NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()),
            Some(64)
        );
        // On the 65th birthday
        assert_eq!(
            record.age_at(&NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()),
            Some(65)
        );
    }
}
