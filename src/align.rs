//! End-to-end alignment: candidates, search, anchors, interpolation.
//!
//! The pipeline is a pure function of (track, photos, start time, end time).
//! Inputs are never mutated; the timestamped track is a new vector.

use log::info;
use serde::{Deserialize, Serialize};

use crate::candidates::TrackIndex;
use crate::error::{AlignError, Result};
use crate::interpolate::{Anchor, AnchorSet, interpolate_track};
use crate::solver::{AssignmentSolver, SearchStats};
use crate::{AlignConfig, CandidateList, PhotoPoint, TrackPoint};

/// Diagnostic trace of one alignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Solver that produced the assignment
    pub solver: String,
    pub track_point_count: usize,
    pub photo_count: usize,
    /// Candidate list per photo, in photo order
    pub candidates: Vec<CandidateList>,
    pub stats: SearchStats,
    /// Summed photo-to-track distance of the chosen assignment
    pub score: f64,
    /// Chosen track index per photo
    pub track_indices: Vec<usize>,
    /// Start, photo and end anchors used for interpolation
    pub anchors: Vec<Anchor>,
    /// Anchor segments with zero arc length
    pub degenerate_segments: usize,
}

/// Fully timestamped track plus its diagnostic report.
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub track: Vec<TrackPoint>,
    pub report: AlignmentReport,
}

/// Align photos against a track using the solver named in `config`.
///
/// `photos` must be sorted by time and lie within `start_time..=end_time`
/// (see [`crate::photos_in_window`]).
///
/// # Example
/// ```
/// use trackstamp::{AlignConfig, AlignError, PhotoPoint, TrackPoint, align_track};
///
/// let track: Vec<TrackPoint> = (0..5).map(|i| TrackPoint::new(0.0, i as f64 * 50.0)).collect();
/// let far_away = vec![PhotoPoint::new(100, 500.0, 500.0)];
///
/// let err = align_track(&track, &far_away, 0, 200, &AlignConfig::default()).unwrap_err();
/// assert!(matches!(err, AlignError::EmptyCandidateList { photo_index: 0 }));
/// ```
pub fn align_track(
    track: &[TrackPoint],
    photos: &[PhotoPoint],
    start_time: i64,
    end_time: i64,
    config: &AlignConfig,
) -> Result<AlignmentResult> {
    let solver = config.solver.solver();
    align_track_with(track, photos, start_time, end_time, config, solver.as_ref())
}

/// Align photos against a track with an explicit solver.
pub fn align_track_with(
    track: &[TrackPoint],
    photos: &[PhotoPoint],
    start_time: i64,
    end_time: i64,
    config: &AlignConfig,
    solver: &dyn AssignmentSolver,
) -> Result<AlignmentResult> {
    validate_inputs(track, photos, start_time, end_time)?;
    info!(
        "[Align] {} photos against {} track points ({} solver)",
        photos.len(),
        track.len(),
        solver.name()
    );

    let index = TrackIndex::new(track)?;
    info!("[Align] Track length {:.1}", index.total_length());

    #[cfg(feature = "parallel")]
    let candidates = crate::candidates::generate_candidates_parallel(&index, photos, config);
    #[cfg(not(feature = "parallel"))]
    let candidates = crate::candidates::generate_candidates(&index, photos, config);

    let outcome = solver.solve(&candidates, photos, config)?;

    let anchors = AnchorSet::from_assignment(
        track.len(),
        start_time,
        end_time,
        &outcome.assignment,
        photos,
    )?;
    let timed = interpolate_track(track, &anchors)?;
    let degenerate_segments = anchors.degenerate_segments(index.arc_lengths());

    info!(
        "[Align] Anchored {} photos at {:?}, score {:.2}",
        photos.len(),
        outcome.assignment.track_indices(),
        outcome.assignment.score
    );

    Ok(AlignmentResult {
        track: timed,
        report: AlignmentReport {
            solver: solver.name().to_string(),
            track_point_count: track.len(),
            photo_count: photos.len(),
            candidates,
            stats: outcome.stats,
            score: outcome.assignment.score,
            track_indices: outcome.assignment.track_indices(),
            anchors: anchors.anchors().to_vec(),
            degenerate_segments,
        },
    })
}

fn validate_inputs(
    track: &[TrackPoint],
    photos: &[PhotoPoint],
    start_time: i64,
    end_time: i64,
) -> Result<()> {
    if track.len() < 2 {
        return Err(AlignError::InsufficientTrackPoints {
            point_count: track.len(),
            minimum_required: 2,
        });
    }
    if let Some(i) = track.iter().position(|p| !p.is_valid()) {
        return Err(AlignError::InvalidInput(format!(
            "track point {} has non-finite coordinates",
            i
        )));
    }
    if let Some(i) = photos.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(AlignError::InvalidInput(format!(
            "photo {} has non-finite coordinates",
            i
        )));
    }
    if photos.windows(2).any(|w| w[1].time < w[0].time) {
        return Err(AlignError::InvalidInput(
            "photos must be sorted by time".to_string(),
        ));
    }
    if end_time < start_time {
        return Err(AlignError::InvalidAnchors(format!(
            "end time {} is before start time {}",
            end_time, start_time
        )));
    }
    Ok(())
}
