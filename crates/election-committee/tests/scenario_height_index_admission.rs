//! Scenario: height/time admission
//!
//! # Invariants under test
//!
//! 1. Five ascending observations are all admitted.
//! 2. Reusing a height is refused, even for the exact same pair.
//! 3. Reusing a time is refused, whether the height is new or already known.
//! 4. `add` succeeds iff `validate` succeeds; a refused `add` changes nothing.
//! 5. After admission both axes are strictly ascending and equally long.
//! 6. A new pair consistent with every recorded pair validates.

use chrono::{DateTime, TimeZone, Utc};
use election_committee::{HeightError, HeightIndex};

const T0: i64 = 1_546_272_000;

fn ts(offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(T0 + offset, 0).unwrap()
}

/// (0, T0), (1, T0+15), ..., (4, T0+60)
fn base_args() -> Vec<(u64, DateTime<Utc>)> {
    (0..5).map(|i| (i, ts(15 * i as i64))).collect()
}

fn valid_args() -> Vec<(u64, DateTime<Utc>)> {
    vec![(30, ts(61)), (20, ts(65))]
}

fn invalid_args() -> Vec<(u64, DateTime<Utc>)> {
    vec![
        // exact duplicate
        (2, ts(30)),
        // known height, new time
        (3, ts(61)),
        // known height, known time of another height
        (4, ts(30)),
        // new height, known time
        (20, ts(30)),
    ]
}

fn populated() -> HeightIndex {
    let mut idx = HeightIndex::new();
    for (h, t) in base_args() {
        idx.add(h, t).expect("ascending observations must be admitted");
    }
    idx
}

fn assert_invariants(idx: &HeightIndex) {
    assert_eq!(idx.heights().len(), idx.times().len());
    for i in 1..idx.len() {
        assert!(idx.heights()[i] > idx.heights()[i - 1]);
        assert!(idx.times()[i] > idx.times()[i - 1]);
    }
}

#[test]
fn new_index_is_empty() {
    let idx = HeightIndex::new();
    assert!(idx.is_empty());
    assert_eq!(idx.len(), 0);
}

#[test]
fn ascending_observations_are_admitted() {
    let idx = populated();
    assert_eq!(idx.len(), 5);
    assert_eq!(idx.heights(), &[0, 1, 2, 3, 4]);
    assert_invariants(&idx);
}

#[test]
fn invalid_observations_are_refused_and_change_nothing() {
    let mut idx = populated();
    let before = idx.clone();

    for (h, t) in invalid_args() {
        assert!(idx.validate(h, t).is_err(), "validate({h}, {t}) must fail");
        assert!(idx.add(h, t).is_err(), "add({h}, {t}) must fail");
        assert_eq!(idx, before, "refused add must not mutate the index");
    }
    assert_invariants(&idx);
}

#[test]
fn consistent_new_pairs_validate() {
    let idx = populated();
    for (h, t) in valid_args() {
        assert!(idx.validate(h, t).is_ok(), "validate({h}, {t}) must pass");
    }
}

#[test]
fn refusals_carry_the_specific_reason() {
    let idx = populated();

    assert_eq!(
        idx.validate(2, ts(30)),
        Err(HeightError::HeightAlreadyRecorded {
            height: 2,
            recorded_at: ts(30),
        })
    );
    assert_eq!(
        idx.validate(3, ts(61)),
        Err(HeightError::HeightAlreadyRecorded {
            height: 3,
            recorded_at: ts(45),
        })
    );
    // Height 4 is stored after time T0+30, so the time collision with height 2
    // is met first while scanning in order.
    assert_eq!(
        idx.validate(4, ts(30)),
        Err(HeightError::TimeAlreadyRecorded {
            time: ts(30),
            recorded_height: 2,
        })
    );
    assert_eq!(
        idx.validate(20, ts(30)),
        Err(HeightError::TimeAlreadyRecorded {
            time: ts(30),
            recorded_height: 2,
        })
    );
    // Height 3 (between 2 and 4) at a time later than every stored time.
    let mut sparse = HeightIndex::new();
    sparse.add(2, ts(0)).unwrap();
    sparse.add(4, ts(10)).unwrap();
    assert_eq!(
        sparse.validate(3, ts(20)),
        Err(HeightError::OrderInconsistent {
            height: 3,
            time: ts(20),
            conflicting_height: 4,
            conflicting_time: ts(10),
        })
    );
}

#[test]
fn add_succeeds_iff_validate_succeeds() {
    let candidates = invalid_args().into_iter().chain(valid_args());
    for (h, t) in candidates {
        let mut idx = populated();
        let probe = idx.validate(h, t);
        let admitted = idx.add(h, t);
        assert_eq!(probe.is_ok(), admitted.is_ok(), "({h}, {t})");
        assert_invariants(&idx);
    }
}

#[test]
fn both_valid_pairs_fit_together() {
    let mut idx = populated();
    // 30 after 20 in height and T0+65 after T0+61 in time would contradict;
    // only one of the two can be admitted.
    idx.add(20, ts(65)).unwrap();
    assert!(matches!(
        idx.add(30, ts(61)),
        Err(HeightError::OrderInconsistent { .. })
    ));
    assert_eq!(idx.heights(), &[0, 1, 2, 3, 4, 20]);
}

#[test]
fn gap_can_be_back_filled() {
    let mut idx = HeightIndex::new();
    idx.add(0, ts(0)).unwrap();
    idx.add(4, ts(60)).unwrap();
    idx.add(2, ts(30)).unwrap();
    idx.add(1, ts(15)).unwrap();
    idx.add(3, ts(45)).unwrap();

    assert_eq!(idx.heights(), populated().heights());
    assert_eq!(idx.times(), populated().times());
}
