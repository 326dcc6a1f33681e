//! Vaccination status classification
//!
//! Given the store lookups for one center and window, partition the
//! eligible roster into five mutually exclusive statuses. Precedence is
//! strict: an administered event during the window outranks everything, a
//! contraindication outranks prior coverage, prior coverage outranks a
//! refusal, and whatever remains is missed. The partition is checked after
//! construction and a violation aborts the report for that center rather
//! than letting a silently wrong count reach a filing.

use rustc_hash::FxHashSet;

use crate::error::{ReportingError, Result};
use crate::models::{ParticipantId, VaccineProgram};

/// A distinct set of participant identifiers
pub type Roster = FxHashSet<ParticipantId>;

/// Row labels of the vaccination report, in emission order
pub const STATUS_ROWS: [&str; 6] = [
    "eligible",
    "contraindicated",
    "received_during",
    "received_prior",
    "refused",
    "missed",
];

/// Store lookups for one (program, center, window) classification.
///
/// Only dated administered events may appear in the two administered sets;
/// undated refusals may appear in `refused`. Duplicate events collapse
/// here because every field is a set.
#[derive(Debug, Default, Clone)]
pub struct ClassifierInput {
    /// Participants whose enrollment covers the window (age-filtered for
    /// programs with an age floor)
    pub eligible: Roster,
    /// Participants with an administered event dated inside the window
    pub administered_in_window: Roster,
    /// Participants with an administered event before the window, inside
    /// the program's lookback horizon
    pub administered_before_window: Roster,
    /// Participants with a contraindicated-status event, any date
    pub contraindicated: Roster,
    /// Participants with a refused-status event in the window
    pub refused: Roster,
}

/// Five disjoint status sets partitioning one eligible roster
#[derive(Debug, Clone)]
pub struct StatusSets {
    /// The roster being partitioned
    pub eligible: Roster,
    /// Administered during the window
    pub received_during: Roster,
    /// Administered before the window, within the lookback horizon
    pub received_prior: Roster,
    /// Medically exempt with no administered event in the window
    pub contraindicated: Roster,
    /// Declined, with no superseding administered or contraindicated record
    pub refused: Roster,
    /// Eligible but unaccounted for; the follow-up roster
    pub missed: Roster,
}

impl StatusSets {
    /// Counts in the report's fixed row order
    #[must_use]
    pub fn counts(&self) -> [usize; 6] {
        [
            self.eligible.len(),
            self.contraindicated.len(),
            self.received_during.len(),
            self.received_prior.len(),
            self.refused.len(),
            self.missed.len(),
        ]
    }

    /// Assert that the five sets partition the eligible roster exactly.
    fn check_partition(&self, program: VaccineProgram, center: &str) -> Result<()> {
        let integrity_err = |detail: String| ReportingError::DataIntegrity {
            program,
            center: center.to_string(),
            detail,
        };

        let classified = self.received_during.len()
            + self.received_prior.len()
            + self.contraindicated.len()
            + self.refused.len();

        if self.missed.len() != self.eligible.len().saturating_sub(classified)
            || classified > self.eligible.len()
        {
            return Err(integrity_err(format!(
                "missed count {} does not equal eligible {} minus classified {}",
                self.missed.len(),
                self.eligible.len(),
                classified
            )));
        }

        let mut seen: Roster = Roster::default();
        seen.reserve(self.eligible.len());
        let statuses = [
            &self.received_during,
            &self.received_prior,
            &self.contraindicated,
            &self.refused,
            &self.missed,
        ];
        for status in statuses {
            for id in status {
                if !self.eligible.contains(id) {
                    return Err(integrity_err(format!(
                        "participant {id} classified but not on the eligible roster"
                    )));
                }
                if !seen.insert(id.clone()) {
                    return Err(integrity_err(format!(
                        "participant {id} classified under more than one status"
                    )));
                }
            }
        }

        if seen.len() != self.eligible.len() {
            return Err(integrity_err(format!(
                "{} eligible participants were not classified",
                self.eligible.len() - seen.len()
            )));
        }

        Ok(())
    }
}

/// Classify one center's eligible roster into mutually exclusive statuses.
///
/// A pure function of its input sets: identical inputs always produce
/// identical outputs, and nothing outside the returned sets is touched.
pub fn classify(
    program: VaccineProgram,
    center: &str,
    input: ClassifierInput,
) -> Result<StatusSets> {
    let ClassifierInput {
        eligible,
        administered_in_window,
        administered_before_window,
        contraindicated,
        refused,
    } = input;

    // An administered event inside the window outranks everything else.
    let received_during: Roster = administered_in_window
        .intersection(&eligible)
        .cloned()
        .collect();

    // An administered record outranks the contraindication flag: if they
    // received the dose, the allergy note is stale or resolved.
    let contraindicated: Roster = contraindicated
        .intersection(&eligible)
        .filter(|id| !received_during.contains(*id))
        .cloned()
        .collect();

    let received_prior: Roster = administered_before_window
        .intersection(&eligible)
        .filter(|id| !received_during.contains(*id) && !contraindicated.contains(*id))
        .cloned()
        .collect();

    // A refusal is ignored when the same participant already has a
    // qualifying administered or contraindicated record; this models
    // refusal-then-reconsideration and stale data entry.
    let refused: Roster = refused
        .intersection(&eligible)
        .filter(|id| {
            !received_during.contains(*id)
                && !received_prior.contains(*id)
                && !contraindicated.contains(*id)
        })
        .cloned()
        .collect();

    let missed: Roster = eligible
        .iter()
        .filter(|id| {
            !received_during.contains(*id)
                && !received_prior.contains(*id)
                && !contraindicated.contains(*id)
                && !refused.contains(*id)
        })
        .cloned()
        .collect();

    let sets = StatusSets {
        eligible,
        received_during,
        received_prior,
        contraindicated,
        refused,
        missed,
    };
    sets.check_partition(program, center)?;

    log::debug!(
        "classified {} roster for {center}: {:?}",
        program,
        sets.counts()
    );

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(ids: &[&str]) -> Roster {
        ids.iter().map(|id| (*id).to_string()).collect()
    }

    #[test]
    fn worked_scenario_partitions_exactly() {
        let input = ClassifierInput {
            eligible: roster(&["1", "2", "3", "4", "5"]),
            administered_in_window: roster(&["1"]),
            administered_before_window: roster(&["2", "1"]),
            contraindicated: roster(&["3"]),
            refused: roster(&["4", "2"]),
        };

        let sets = classify(VaccineProgram::Pneumococcal, "Providence", input).unwrap();

        assert_eq!(sets.received_during, roster(&["1"]));
        assert_eq!(sets.contraindicated, roster(&["3"]));
        assert_eq!(sets.received_prior, roster(&["2"]));
        assert_eq!(sets.refused, roster(&["4"]));
        assert_eq!(sets.missed, roster(&["5"]));
    }

    #[test]
    fn administered_outranks_contraindication() {
        let input = ClassifierInput {
            eligible: roster(&["1"]),
            administered_in_window: roster(&["1"]),
            contraindicated: roster(&["1"]),
            ..ClassifierInput::default()
        };

        let sets = classify(VaccineProgram::Influenza, "Westerly", input).unwrap();
        assert_eq!(sets.received_during, roster(&["1"]));
        assert!(sets.contraindicated.is_empty());
    }

    #[test]
    fn prior_coverage_outranks_refusal() {
        let input = ClassifierInput {
            eligible: roster(&["1"]),
            administered_before_window: roster(&["1"]),
            refused: roster(&["1"]),
            ..ClassifierInput::default()
        };

        let sets = classify(VaccineProgram::Pneumococcal, "Woonsocket", input).unwrap();
        assert_eq!(sets.received_prior, roster(&["1"]));
        assert!(sets.refused.is_empty());
    }

    #[test]
    fn events_outside_roster_are_ignored() {
        let input = ClassifierInput {
            eligible: roster(&["1"]),
            administered_in_window: roster(&["9"]),
            refused: roster(&["8"]),
            ..ClassifierInput::default()
        };

        let sets = classify(VaccineProgram::Pneumococcal, "Providence", input).unwrap();
        assert!(sets.received_during.is_empty());
        assert_eq!(sets.missed, roster(&["1"]));
    }

    #[test]
    fn classification_is_idempotent() {
        let input = ClassifierInput {
            eligible: roster(&["1", "2", "3"]),
            administered_in_window: roster(&["2"]),
            refused: roster(&["3"]),
            ..ClassifierInput::default()
        };

        let first = classify(VaccineProgram::Influenza, "Providence", input.clone()).unwrap();
        let second = classify(VaccineProgram::Influenza, "Providence", input).unwrap();
        assert_eq!(first.counts(), second.counts());
        assert_eq!(first.missed, second.missed);
    }
}
