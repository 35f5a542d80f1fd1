//! Synthetic hike generator for stress testing and benchmarking.
//!
//! Generates a planar track walked at constant speed and a set of photos
//! taken at known track points, providing ground truth for validating
//! candidate generation, the solvers and interpolation.
//!
//! Feature-gated behind `synthetic`, not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use trackstamp::synthetic::{HikePattern, SyntheticHike};
//!
//! let hike = SyntheticHike {
//!     length_meters: 5_000.0,
//!     pattern: HikePattern::Winding,
//!     photo_count: 8,
//!     ..SyntheticHike::default()
//! };
//!
//! let dataset = hike.generate();
//! assert_eq!(dataset.photos.len(), 8);
//! assert_eq!(dataset.true_indices.len(), 8);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::geometry::cumulative_arc_lengths;
use crate::{PhotoPoint, TrackPoint};

/// Shape of the generated track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HikePattern {
    /// Straight line with minor perturbation.
    Straight,
    /// Trail with realistic turns.
    Winding,
    /// Loop that returns near its start point.
    Loop,
    /// Out-and-back: the second half retraces the first.
    OutAndBack,
}

/// Scenario configuration for a synthetic hike.
#[derive(Debug, Clone)]
pub struct SyntheticHike {
    /// Track length in metres.
    pub length_meters: f64,
    /// Spacing between consecutive track points in metres.
    pub point_spacing: f64,
    pub pattern: HikePattern,
    /// Number of photos, taken at distinct interior track points.
    pub photo_count: usize,
    /// Standard deviation of photo position error in metres.
    pub photo_noise_sigma_meters: f64,
    /// Walking speed in metres per second.
    pub speed: f64,
    /// Unix timestamp of the first track point.
    pub start_time: i64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

impl Default for SyntheticHike {
    fn default() -> Self {
        Self {
            length_meters: 2_000.0,
            point_spacing: 10.0,
            pattern: HikePattern::Winding,
            photo_count: 5,
            photo_noise_sigma_meters: 5.0,
            speed: 1.0,
            start_time: 1_600_000_000,
            seed: 42,
        }
    }
}

/// A generated hike with ground truth.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// Untimed track (elevation set).
    pub track: Vec<TrackPoint>,
    /// Photos sorted by time.
    pub photos: Vec<PhotoPoint>,
    /// Track index each photo was taken at.
    pub true_indices: Vec<usize>,
    /// Ground-truth time of every track point.
    pub true_times: Vec<i64>,
    pub start_time: i64,
    pub end_time: i64,
}

/// Add Gaussian noise to a position (Box-Muller).
fn add_noise(xy: [f64; 2], sigma: f64, rng: &mut StdRng) -> [f64; 2] {
    if sigma <= 0.0 {
        return xy;
    }
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.r#gen();
    let r = (-2.0 * u1.ln()).sqrt();
    [
        xy[0] + r * (2.0 * PI * u2).cos() * sigma,
        xy[1] + r * (2.0 * PI * u2).sin() * sigma,
    ]
}

impl SyntheticHike {
    /// Generate the track and photos.
    pub fn generate(&self) -> SyntheticDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let track = self.generate_track(&mut rng);

        let arc = cumulative_arc_lengths(&track);
        let true_times: Vec<i64> = arc
            .iter()
            .map(|d| self.start_time + (d / self.speed).floor() as i64)
            .collect();

        // Distinct interior indices, spread over the track
        let interior = track.len().saturating_sub(2);
        let count = self.photo_count.min(interior);
        let mut true_indices: Vec<usize> = Vec::with_capacity(count);
        if count > 0 {
            let stride = interior as f64 / count as f64;
            for i in 0..count {
                let lo = 1 + (i as f64 * stride) as usize;
                let hi = (1 + ((i + 1) as f64 * stride) as usize).max(lo + 1);
                true_indices.push(rng.gen_range(lo..hi));
            }
        }

        let photos: Vec<PhotoPoint> = true_indices
            .iter()
            .map(|&idx| {
                let [x, y] = add_noise(track[idx].xy(), self.photo_noise_sigma_meters, &mut rng);
                PhotoPoint::new(true_times[idx], x, y)
            })
            .collect();

        SyntheticDataset {
            start_time: self.start_time,
            end_time: true_times.last().copied().unwrap_or(self.start_time),
            track,
            photos,
            true_indices,
            true_times,
        }
    }

    fn generate_track(&self, rng: &mut StdRng) -> Vec<TrackPoint> {
        let num_steps = (self.length_meters / self.point_spacing).ceil().max(1.0) as usize;
        let outbound_steps = match self.pattern {
            HikePattern::OutAndBack => num_steps.div_ceil(2),
            _ => num_steps,
        };

        let mut heading: f64 = rng.gen_range(0.0..2.0 * PI);
        let mut current = [500_000.0, 4_500_000.0];
        let mut points = Vec::with_capacity(num_steps + 1);
        points.push(TrackPoint::with_elevation(current[0], current[1], 300.0));

        for i in 0..outbound_steps {
            heading += match self.pattern {
                HikePattern::Straight | HikePattern::OutAndBack => rng.gen_range(-0.02..0.02),
                HikePattern::Winding => {
                    (i as f64 * 0.01).sin() * 0.3 + rng.gen_range(-0.15..0.15)
                }
                HikePattern::Loop => 2.0 * PI / num_steps as f64 + rng.gen_range(-0.05..0.05),
            };
            current[0] += self.point_spacing * heading.cos();
            current[1] += self.point_spacing * heading.sin();
            points.push(TrackPoint::with_elevation(
                current[0],
                current[1],
                300.0 + 50.0 * (i as f64 * 0.005).sin(),
            ));
        }

        if self.pattern == HikePattern::OutAndBack {
            let back: Vec<TrackPoint> = points.iter().rev().skip(1).copied().collect();
            points.extend(back);
        }

        points
    }
}
