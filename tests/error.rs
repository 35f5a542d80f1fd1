//! Tests for error module

use trackstamp::error::{AlignError, OptionExt};

#[test]
fn test_error_display() {
    let err = AlignError::InsufficientTrackPoints {
        point_count: 1,
        minimum_required: 2,
    };
    assert!(err.to_string().contains("1 points"));

    let err = AlignError::EmptyCandidateList { photo_index: 3 };
    assert!(err.to_string().contains("photo 3"));
}

#[test]
fn test_option_ext() {
    let none: Option<i32> = None;
    let result = none.ok_or_insufficient_points(0, 2);
    assert!(matches!(
        result,
        Err(AlignError::InsufficientTrackPoints { .. })
    ));
    assert_eq!(Some(4).ok_or_insufficient_points(5, 2), Ok(4));
}

#[test]
fn test_is_infeasible() {
    assert!(AlignError::EmptyCandidateList { photo_index: 0 }.is_infeasible());
    assert!(
        AlignError::NoFeasibleAssignment {
            photo_count: 2,
            combinations: 1
        }
        .is_infeasible()
    );
    assert!(
        AlignError::SearchBudgetExceeded {
            combinations: 10,
            budget: 5
        }
        .is_infeasible()
    );
    assert!(
        !AlignError::BoundaryIndexCollision {
            photo_index: 0,
            track_index: 0
        }
        .is_infeasible()
    );
}
