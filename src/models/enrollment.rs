//! Enrollment intervals and census groupings

use chrono::NaiveDate;

use crate::models::ParticipantId;
use crate::period::DateRange;

/// Why a participant left the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisenrollReason {
    /// Participant died while enrolled
    Deceased,
    /// Participant or representative chose to leave
    Voluntary,
    /// Any other recorded reason
    Other,
}

impl DisenrollReason {
    /// Decode the store's free-text disenrollment type
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Deceased" => Self::Deceased,
            "Voluntary" => Self::Voluntary,
            _ => Self::Other,
        }
    }
}

/// Payer-mix grouping used by the enrollment census rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayerGroup {
    /// No payer restriction
    All,
    /// Medicare and Medicaid
    Dual,
    /// Medicare without Medicaid
    MedicareOnly,
    /// Medicaid without Medicare
    MedicaidOnly,
    /// Neither payer
    PrivatePay,
}

impl PayerGroup {
    /// The four mutually exclusive payer rows reported under each census total
    pub const BREAKDOWN: [Self; 4] = [
        Self::Dual,
        Self::MedicareOnly,
        Self::MedicaidOnly,
        Self::PrivatePay,
    ];

    /// Whether coverage flags fall in this group
    #[must_use]
    pub fn matches(&self, medicare: bool, medicaid: bool) -> bool {
        match self {
            Self::All => true,
            Self::Dual => medicare && medicaid,
            Self::MedicareOnly => medicare && !medicaid,
            Self::MedicaidOnly => !medicare && medicaid,
            Self::PrivatePay => !medicare && !medicaid,
        }
    }

    /// Row label used in the census report
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Dual => "Dual",
            Self::MedicareOnly => "Medicare",
            Self::MedicaidOnly => "Medicaid",
            Self::PrivatePay => "Private Pay",
        }
    }
}

/// One participant's enrollment span at a service center.
///
/// Invariant: `enrollment_date <= disenrollment_date` when both are present.
/// Intervals are created by enrollment-event ingestion upstream and are
/// immutable once closed; this crate only reads them.
#[derive(Debug, Clone)]
pub struct EnrollmentInterval {
    /// Enrollment system identifier
    pub member_id: ParticipantId,
    /// Service center the participant attends
    pub center: String,
    /// First day of enrollment
    pub enrollment_date: NaiveDate,
    /// Last day of enrollment; `None` while currently enrolled
    pub disenrollment_date: Option<NaiveDate>,
    /// Reason the interval closed, when it has
    pub disenroll_reason: Option<DisenrollReason>,
    /// Medicare coverage flag
    pub medicare: bool,
    /// Medicaid coverage flag
    pub medicaid: bool,
}

impl EnrollmentInterval {
    /// Whether the interval overlaps the window: enrolled on or before the
    /// window end and not disenrolled before the window start.
    #[must_use]
    pub fn covers(&self, range: &DateRange) -> bool {
        self.enrollment_date <= range.end
            && self.disenrollment_date.is_none_or(|d| d >= range.start)
    }

    /// Reference date for age checks: the disenrollment date when the
    /// participant left mid-period, else the period end. A participant who
    /// disenrolled before a birthday is assessed at the age they had on
    /// leaving, not the age they would have reached later in the period.
    #[must_use]
    pub fn age_reference(&self, period_end: NaiveDate) -> NaiveDate {
        self.disenrollment_date.unwrap_or(period_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(enrolled: NaiveDate, disenrolled: Option<NaiveDate>) -> EnrollmentInterval {
        EnrollmentInterval {
            member_id: "1001".to_string(),
            center: "Providence".to_string(),
            enrollment_date: enrolled,
            disenrollment_date: disenrolled,
            disenroll_reason: None,
            medicare: true,
            medicaid: false,
        }
    }

    #[test]
    fn coverage_boundary_on_period_start() {
        let range = DateRange {
            start: date(2025, 4, 1),
            end: date(2025, 6, 30),
        };

        // Disenrolled exactly on period start: still covered
        assert!(interval(date(2024, 1, 1), Some(date(2025, 4, 1))).covers(&range));
        // One day earlier: not covered
        assert!(!interval(date(2024, 1, 1), Some(date(2025, 3, 31))).covers(&range));
        // Open interval is covered
        assert!(interval(date(2024, 1, 1), None).covers(&range));
        // Enrolled after period end: not covered
        assert!(!interval(date(2025, 7, 1), None).covers(&range));
    }

    #[test]
    fn age_reference_prefers_disenrollment_date() {
        let period_end = date(2025, 6, 30);
        assert_eq!(
            interval(date(2024, 1, 1), Some(date(2025, 5, 2))).age_reference(period_end),
            date(2025, 5, 2)
        );
        assert_eq!(
            interval(date(2024, 1, 1), None).age_reference(period_end),
            period_end
        );
    }

    #[test]
    fn payer_groups_are_mutually_exclusive() {
        for (medicare, medicaid) in [(true, true), (true, false), (false, true), (false, false)] {
            let matching = PayerGroup::BREAKDOWN
                .iter()
                .filter(|g| g.matches(medicare, medicaid))
                .count();
            assert_eq!(matching, 1);
        }
        assert!(PayerGroup::All.matches(true, false));
    }
}
