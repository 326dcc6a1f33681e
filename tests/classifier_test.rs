//! End-to-end classification tests over the in-memory store: the store
//! answers the window queries, the classifier partitions the roster.

use chrono::NaiveDate;

use hpms_reporting::algorithm::{ClassifierInput, ProgramPolicy, classify};
use hpms_reporting::models::{
    DemographicRecord, DoseStatus, EnrollmentInterval, ImmunizationEvent, VaccineProgram,
};
use hpms_reporting::period::{DateRange, flu_season};
use hpms_reporting::store::{MemoryStore, PopulationStore};

const CENTER: &str = "Providence";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn enrollment(member_id: &str, enrolled: NaiveDate, disenrolled: Option<NaiveDate>) -> EnrollmentInterval {
    EnrollmentInterval {
        member_id: member_id.to_string(),
        center: CENTER.to_string(),
        enrollment_date: enrolled,
        disenrollment_date: disenrolled,
        disenroll_reason: None,
        medicare: true,
        medicaid: true,
    }
}

fn event(
    member_id: &str,
    program: VaccineProgram,
    administered: Option<NaiveDate>,
    status: DoseStatus,
) -> ImmunizationEvent {
    ImmunizationEvent {
        member_id: member_id.to_string(),
        program,
        date_administered: administered,
        dose_status: status,
    }
}

fn classify_with(
    store: &MemoryStore,
    program: VaccineProgram,
    window: &DateRange,
) -> hpms_reporting::StatusSets {
    let policy = ProgramPolicy::for_program(program);
    let input = ClassifierInput {
        eligible: store.eligible_roster(CENTER, window, policy.min_age).unwrap(),
        administered_in_window: store.administered_within(program, CENTER, window).unwrap(),
        administered_before_window: store
            .administered_before(program, CENTER, window.start, policy.lookback_horizon(window))
            .unwrap(),
        contraindicated: store.contraindicated(program, CENTER).unwrap(),
        refused: store.refused_within(program, CENTER, window).unwrap(),
    };
    classify(program, CENTER, input).unwrap()
}

#[test]
fn influenza_prior_window_is_season_bounded() {
    let mut store = MemoryStore::new();
    let window = flu_season(2025); // 2024-10-01 through 2025-03-31

    for id in ["1", "2", "3"] {
        store.add_enrollment(enrollment(id, date(2023, 1, 1), None));
    }
    // Shot in September: counts as prior coverage for the season
    store.add_event(event(
        "1",
        VaccineProgram::Influenza,
        Some(date(2024, 9, 10)),
        DoseStatus::Administered,
    ));
    // Shot four months before the season opens: protection lapsed, missed
    store.add_event(event(
        "2",
        VaccineProgram::Influenza,
        Some(date(2024, 6, 1)),
        DoseStatus::Administered,
    ));

    let sets = classify_with(&store, VaccineProgram::Influenza, &window);
    assert!(sets.received_prior.contains("1"));
    assert!(sets.missed.contains("2"));
    assert!(sets.missed.contains("3"));
}

#[test]
fn pneumococcal_prior_window_is_unbounded() {
    let mut store = MemoryStore::new();
    let window = DateRange {
        start: date(2025, 4, 1),
        end: date(2025, 6, 30),
    };

    store.add_enrollment(enrollment("1", date(2020, 1, 1), None));
    store.add_demographic(DemographicRecord {
        member_id: "1".to_string(),
        dob: date(1950, 3, 3),
    });
    // A shot from years back still counts for a once-in-a-lifetime vaccine
    store.add_event(event(
        "1",
        VaccineProgram::Pneumococcal,
        Some(date(2018, 11, 20)),
        DoseStatus::Administered,
    ));

    let sets = classify_with(&store, VaccineProgram::Pneumococcal, &window);
    assert!(sets.received_prior.contains("1"));
}

#[test]
fn pneumococcal_age_boundary_at_reference_date() {
    let mut store = MemoryStore::new();
    let window = DateRange {
        start: date(2025, 4, 1),
        end: date(2025, 6, 30),
    };

    // Turns exactly 65 on the period end: eligible
    store.add_enrollment(enrollment("1", date(2024, 1, 1), None));
    store.add_demographic(DemographicRecord {
        member_id: "1".to_string(),
        dob: date(1960, 6, 30),
    });
    // One day short of 65 at period end: excluded
    store.add_enrollment(enrollment("2", date(2024, 1, 1), None));
    store.add_demographic(DemographicRecord {
        member_id: "2".to_string(),
        dob: date(1960, 7, 1),
    });
    // Disenrolled at 64, even though they turn 65 inside the period
    store.add_enrollment(enrollment("3", date(2024, 1, 1), Some(date(2025, 5, 1))));
    store.add_demographic(DemographicRecord {
        member_id: "3".to_string(),
        dob: date(1960, 6, 1),
    });

    let sets = classify_with(&store, VaccineProgram::Pneumococcal, &window);
    assert!(sets.eligible.contains("1"));
    assert!(!sets.eligible.contains("2"));
    assert!(!sets.eligible.contains("3"));
}

#[test]
fn duplicate_administered_events_collapse() {
    let mut store = MemoryStore::new();
    let window = DateRange {
        start: date(2025, 1, 1),
        end: date(2025, 3, 31),
    };

    store.add_enrollment(enrollment("1", date(2024, 1, 1), None));
    for day in [10, 24] {
        store.add_event(event(
            "1",
            VaccineProgram::Influenza,
            Some(date(2025, 2, day)),
            DoseStatus::Administered,
        ));
    }

    let sets = classify_with(&store, VaccineProgram::Influenza, &window);
    assert_eq!(sets.received_during.len(), 1);
    assert_eq!(sets.counts(), [1, 0, 1, 0, 0, 0]);
}

#[test]
fn undated_administered_events_never_count() {
    let mut store = MemoryStore::new();
    let window = DateRange {
        start: date(2025, 1, 1),
        end: date(2025, 3, 31),
    };

    store.add_enrollment(enrollment("1", date(2024, 1, 1), None));
    store.add_event(event(
        "1",
        VaccineProgram::Influenza,
        None,
        DoseStatus::Administered,
    ));

    let sets = classify_with(&store, VaccineProgram::Influenza, &window);
    assert!(sets.missed.contains("1"));
}

#[test]
fn disenrollment_on_period_start_is_still_eligible() {
    let mut store = MemoryStore::new();
    let window = DateRange {
        start: date(2025, 1, 1),
        end: date(2025, 3, 31),
    };

    store.add_enrollment(enrollment("1", date(2024, 1, 1), Some(date(2025, 1, 1))));
    store.add_enrollment(enrollment("2", date(2024, 1, 1), Some(date(2024, 12, 31))));

    let sets = classify_with(&store, VaccineProgram::Influenza, &window);
    assert!(sets.eligible.contains("1"));
    assert!(!sets.eligible.contains("2"));
}

#[test]
fn undated_refusal_counts_as_refused() {
    let mut store = MemoryStore::new();
    let window = DateRange {
        start: date(2025, 1, 1),
        end: date(2025, 3, 31),
    };

    store.add_enrollment(enrollment("1", date(2024, 1, 1), None));
    store.add_event(event("1", VaccineProgram::Influenza, None, DoseStatus::Refused));

    let sets = classify_with(&store, VaccineProgram::Influenza, &window);
    assert!(sets.refused.contains("1"));
    assert!(sets.missed.is_empty());
}
