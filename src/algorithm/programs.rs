//! Per-program classification policy
//!
//! The two vaccine programs share one classifier and differ only in their
//! eligibility predicate and lookback-window length; both knobs live here.

use chrono::{Months, NaiveDate};

use crate::models::VaccineProgram;
use crate::period::DateRange;

/// How far before the reporting window an administered event still counts
/// as prior coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// Any prior administered event counts
    Unbounded,
    /// Only events within this many months before the window start count
    Bounded(Months),
}

/// Eligibility and lookback policy for one vaccine program
#[derive(Debug, Clone, Copy)]
pub struct ProgramPolicy {
    /// Minimum age at the reference date, when the program has an age floor
    pub min_age: Option<u32>,
    /// Prior-coverage window
    pub lookback: Lookback,
}

impl ProgramPolicy {
    /// The policy for a program.
    ///
    /// Pneumococcal vaccination is effectively once in a lifetime for this
    /// population, so any prior administered event counts and the roster is
    /// limited to participants 65 and older. Influenza protection lapses
    /// between seasons, so "prior" means already covered this season: only
    /// the two months before the window opens count.
    #[must_use]
    pub fn for_program(program: VaccineProgram) -> Self {
        match program {
            VaccineProgram::Pneumococcal => Self {
                min_age: Some(65),
                lookback: Lookback::Unbounded,
            },
            VaccineProgram::Influenza => Self {
                min_age: None,
                lookback: Lookback::Bounded(Months::new(2)),
            },
        }
    }

    /// Earliest administration date that still counts as prior coverage.
    ///
    /// `None` means the lookback is unbounded.
    #[must_use]
    pub fn lookback_horizon(&self, window: &DateRange) -> Option<NaiveDate> {
        match self.lookback {
            Lookback::Unbounded => None,
            Lookback::Bounded(months) => window.start.checked_sub_months(months),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn influenza_lookback_is_season_bounded() {
        let policy = ProgramPolicy::for_program(VaccineProgram::Influenza);
        let window = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        };
        assert_eq!(
            policy.lookback_horizon(&window),
            Some(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
        );
        assert_eq!(policy.min_age, None);
    }

    #[test]
    fn pneumococcal_lookback_is_unbounded() {
        let policy = ProgramPolicy::for_program(VaccineProgram::Pneumococcal);
        let window = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        };
        assert_eq!(policy.lookback_horizon(&window), None);
        assert_eq!(policy.min_age, Some(65));
    }
}
