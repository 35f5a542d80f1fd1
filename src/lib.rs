//! # Trackstamp
//!
//! Timestamp an untimed GPS track using a sparse set of timestamped photos.
//!
//! This library provides:
//! - Candidate generation: which track points could each photo have been taken at
//! - Assignment search: one track point per photo, in photo-time order, minimising
//!   the total photo-to-track distance
//! - Temporal interpolation: spread the known times over every track point by arc length
//! - Photo preparation: time-window filtering and burst clustering
//!
//! All coordinates are planar (e.g. UTM metres). Reading GPX/GeoJSON, EXIF
//! extraction and reprojection happen outside this crate.
//!
//! ## Features
//!
//! - **`parallel`** - Generate candidate lists in parallel with rayon
//! - **`synthetic`** - Deterministic synthetic hikes for tests and benchmarks
//!
//! ## Quick Start
//!
//! ```rust
//! use trackstamp::{AlignConfig, PhotoPoint, TrackPoint, align_track};
//!
//! let track: Vec<TrackPoint> = (0..5)
//!     .map(|i| TrackPoint::new(0.0, i as f64 * 50.0))
//!     .collect();
//! let photos = vec![PhotoPoint::new(1_000, 5.0, 100.0)];
//!
//! let result = align_track(&track, &photos, 0, 2_000, &AlignConfig::default()).unwrap();
//! assert_eq!(result.report.track_indices, vec![2]);
//! assert_eq!(result.track[1].time, Some(500));
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{AlignError, OptionExt, Result};

// Planar distance, ordering checks and arc lengths
pub mod geometry;

// Per-photo candidate generation
pub mod candidates;
#[cfg(feature = "parallel")]
pub use candidates::generate_candidates_parallel;
pub use candidates::{TrackIndex, generate_candidates, merge_hits};

// Assignment search (brute force and dynamic programming)
pub mod solver;
pub use solver::{
    AssignmentSolver, BruteForceSolver, DynamicProgrammingSolver, SearchOutcome, SearchStats,
};

// Arc-length interpolation between anchors
pub mod interpolate;
pub use interpolate::{Anchor, AnchorSet, interpolate_times, interpolate_track};

// Photo filtering and burst clustering
pub mod photos;
pub use photos::{PhotoCluster, PhotoClusterConfig, cluster_photo_bursts, photos_in_window};

// End-to-end pipeline
pub mod align;
pub use align::{AlignmentReport, AlignmentResult, align_track, align_track_with};

// Synthetic hikes for stress testing and benchmarking
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A point of the track in planar coordinates.
///
/// # Example
/// ```
/// use trackstamp::TrackPoint;
/// let point = TrackPoint::with_elevation(500_123.0, 4_649_776.0, 1210.0);
/// assert!(point.time.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
    /// Elevation in meters, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// Unix timestamp (seconds since epoch), once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl TrackPoint {
    /// Create a new untimed track point without elevation.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            elevation: None,
            time: None,
        }
    }

    /// Create a new untimed track point with elevation.
    pub fn with_elevation(x: f64, y: f64, elevation: f64) -> Self {
        Self {
            x,
            y,
            elevation: Some(elevation),
            time: None,
        }
    }

    /// Position as an `[x, y]` pair.
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Check if the point has finite coordinates.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A geotagged photo: when and where it was taken.
///
/// Photo sequences handed to the search must be sorted ascending by `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoPoint {
    /// Unix timestamp (seconds since epoch)
    pub time: i64,
    pub x: f64,
    pub y: f64,
}

impl PhotoPoint {
    pub fn new(time: i64, x: f64, y: f64) -> Self {
        Self { time, x, y }
    }

    /// Position as an `[x, y]` pair.
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// A track point considered as a plausible match for one photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Index into the track
    pub track_index: usize,
    /// Cumulative arc length from the track start to `track_index`
    pub arc_length: f64,
    /// Distance from the photo to the track point
    pub distance: f64,
}

/// Candidates for one photo, ordered by increasing track index.
pub type CandidateList = Vec<Candidate>;

/// One chosen candidate per photo plus the total matched distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Chosen candidate for each photo, in photo order
    pub choices: Vec<Candidate>,
    /// Sum of the chosen distances
    pub score: f64,
}

impl Assignment {
    /// Track index chosen for each photo.
    pub fn track_indices(&self) -> Vec<usize> {
        self.choices.iter().map(|c| c.track_index).collect()
    }

    /// Indices strictly ascending and clear of the track's first and last point.
    pub fn is_valid(&self, track_len: usize) -> bool {
        let last = track_len.saturating_sub(1);
        geometry::is_strictly_ascending(self.choices.iter().map(|c| c.track_index))
            && self
                .choices
                .iter()
                .all(|c| c.track_index != 0 && c.track_index != last)
    }
}

/// Which assignment solver the pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Exhaustive Cartesian-product enumeration
    #[default]
    BruteForce,
    /// O(M·K²) dynamic programming over candidates
    DynamicProgramming,
}

impl SolverKind {
    pub fn solver(&self) -> Box<dyn AssignmentSolver + Send + Sync> {
        match self {
            SolverKind::BruteForce => Box::new(BruteForceSolver),
            SolverKind::DynamicProgramming => Box::new(DynamicProgrammingSolver),
        }
    }
}

/// Configuration for candidate generation and assignment search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// A track point within this distance of a photo is a raw hit.
    /// Default: 50.0 (metres in a UTM projection)
    pub max_photo_distance: f64,

    /// Arc-length span of a merge window. Each window yields at most one candidate.
    /// Default: 100.0
    pub window_span: f64,

    /// Maximum plausible travel speed (planar units per second) between
    /// consecutive assigned photos. `None` disables the check.
    /// Default: None
    pub max_speed: Option<f64>,

    /// Upper bound on combinations the brute-force solver will enumerate.
    /// Exceeding it is reported as infeasibility. `None` means unbounded.
    /// Default: 10_000_000
    pub max_combinations: Option<u64>,

    /// Candidate products above this size are logged as a warning.
    /// Default: 100_000
    pub warn_combinations: u64,

    /// Solver used by [`align_track`].
    /// Default: brute force
    pub solver: SolverKind,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_photo_distance: 50.0,
            window_span: 100.0,
            max_speed: None,
            max_combinations: Some(10_000_000),
            warn_combinations: 100_000,
            solver: SolverKind::BruteForce,
        }
    }
}
