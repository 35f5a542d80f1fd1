//! Error types for track alignment.

use thiserror::Error;

/// Errors that make a run infeasible.
///
/// None of these are retried: a run either produces a fully timestamped
/// track or one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    #[error("track has {point_count} points, need at least {minimum_required}")]
    InsufficientTrackPoints {
        point_count: usize,
        minimum_required: usize,
    },

    #[error("photo {photo_index} has no track point within range")]
    EmptyCandidateList { photo_index: usize },

    #[error(
        "no assignment of {photo_count} photos follows track order ({combinations} combinations tried)"
    )]
    NoFeasibleAssignment { photo_count: usize, combinations: u64 },

    #[error("photo {photo_index} assigned to boundary track index {track_index}")]
    BoundaryIndexCollision {
        photo_index: usize,
        track_index: usize,
    },

    #[error("search space of {combinations} combinations exceeds budget of {budget}")]
    SearchBudgetExceeded { combinations: u64, budget: u64 },

    #[error("invalid anchors: {0}")]
    InvalidAnchors(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AlignError {
    /// True for every error that means "no consistent assignment exists".
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            AlignError::EmptyCandidateList { .. }
                | AlignError::NoFeasibleAssignment { .. }
                | AlignError::SearchBudgetExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;

/// Convenience conversions from `Option` into [`AlignError`].
pub trait OptionExt<T> {
    fn ok_or_insufficient_points(self, point_count: usize, minimum_required: usize) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(self, point_count: usize, minimum_required: usize) -> Result<T> {
        self.ok_or(AlignError::InsufficientTrackPoints {
            point_count,
            minimum_required,
        })
    }
}
