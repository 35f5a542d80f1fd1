//! Temporal interpolation of track times between anchors.
//!
//! Anchors are track indices with a known time: the track's first point
//! (start time), its last point (end time) and every assigned photo. Between
//! two consecutive anchors, time is spread linearly over arc length, i.e.
//! uniform speed within a segment but a different average speed per segment.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::geometry::{cumulative_arc_lengths, is_strictly_ascending};
use crate::{Assignment, PhotoPoint, TrackPoint};

/// A track index with a fixed, known time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub index: usize,
    /// Unix timestamp (seconds)
    pub time: i64,
}

/// Anchors in ascending index order, starting at index 0 and ending at the
/// track's last index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

impl AnchorSet {
    /// Build the anchor set for a track of `track_len` points.
    ///
    /// `photo_anchors` holds one `(track_index, time)` per photo in photo
    /// order. Photo anchors may not sit on the first or last track index,
    /// indices must be strictly ascending and times non-decreasing.
    pub fn new(
        track_len: usize,
        start_time: i64,
        end_time: i64,
        photo_anchors: &[(usize, i64)],
    ) -> Result<Self> {
        if track_len < 2 {
            return Err(AlignError::InsufficientTrackPoints {
                point_count: track_len,
                minimum_required: 2,
            });
        }
        let last = track_len - 1;

        for (photo_index, &(track_index, _)) in photo_anchors.iter().enumerate() {
            if track_index == 0 || track_index == last {
                return Err(AlignError::BoundaryIndexCollision {
                    photo_index,
                    track_index,
                });
            }
            if track_index > last {
                return Err(AlignError::InvalidAnchors(format!(
                    "photo {} anchored at index {} beyond track end {}",
                    photo_index, track_index, last
                )));
            }
        }

        let mut anchors = Vec::with_capacity(photo_anchors.len() + 2);
        anchors.push(Anchor {
            index: 0,
            time: start_time,
        });
        anchors.extend(
            photo_anchors
                .iter()
                .map(|&(index, time)| Anchor { index, time }),
        );
        anchors.push(Anchor {
            index: last,
            time: end_time,
        });

        if !is_strictly_ascending(anchors.iter().map(|a| a.index)) {
            return Err(AlignError::InvalidAnchors(
                "anchor indices are not strictly ascending".to_string(),
            ));
        }
        if let Some(w) = anchors.windows(2).find(|w| w[1].time < w[0].time) {
            return Err(AlignError::InvalidAnchors(format!(
                "time goes backwards between index {} ({}) and index {} ({})",
                w[0].index, w[0].time, w[1].index, w[1].time
            )));
        }

        Ok(Self { anchors })
    }

    /// Anchor set from a solved assignment: photo `i` pins its chosen index
    /// to `photos[i].time`.
    pub fn from_assignment(
        track_len: usize,
        start_time: i64,
        end_time: i64,
        assignment: &Assignment,
        photos: &[PhotoPoint],
    ) -> Result<Self> {
        if assignment.choices.len() != photos.len() {
            return Err(AlignError::InvalidInput(format!(
                "assignment covers {} photos, expected {}",
                assignment.choices.len(),
                photos.len()
            )));
        }
        let photo_anchors: Vec<(usize, i64)> = assignment
            .choices
            .iter()
            .zip(photos)
            .map(|(c, p)| (c.track_index, p.time))
            .collect();
        Self::new(track_len, start_time, end_time, &photo_anchors)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Index of the track's last point.
    pub fn last_index(&self) -> usize {
        self.anchors.last().map_or(0, |a| a.index)
    }

    /// Number of segments whose two anchors have zero arc length between them.
    pub fn degenerate_segments(&self, arc_lengths: &[f64]) -> usize {
        self.anchors
            .windows(2)
            .filter(|w| arc_lengths[w[1].index] - arc_lengths[w[0].index] <= 0.0)
            .count()
    }
}

/// Assign a time to every track point.
///
/// `arc_lengths` are cumulative arc lengths for the whole track. A point
/// between anchors `a` and `b` gets
/// `t_a + floor((t_b - t_a) * (arc - arc_a) / (arc_b - arc_a))`.
/// Anchors keep their exact time. A segment with zero arc length gives every
/// interior point `t_a`.
pub fn interpolate_times(arc_lengths: &[f64], anchors: &AnchorSet) -> Result<Vec<i64>> {
    if arc_lengths.len() != anchors.last_index() + 1 {
        return Err(AlignError::InvalidAnchors(format!(
            "anchors cover {} points, track has {}",
            anchors.last_index() + 1,
            arc_lengths.len()
        )));
    }

    let mut times = vec![0i64; arc_lengths.len()];

    for w in anchors.anchors().windows(2) {
        let (a, b) = (w[0], w[1]);
        times[a.index] = a.time;

        let base = arc_lengths[a.index];
        let span = arc_lengths[b.index] - base;
        let elapsed = (b.time - a.time) as f64;

        if span <= 0.0 {
            debug!(
                "[Interpolate] Zero-length segment {}..{}, holding time {}",
                a.index, b.index, a.time
            );
        }

        for i in a.index + 1..b.index {
            times[i] = if span > 0.0 {
                a.time + (elapsed * (arc_lengths[i] - base) / span).floor() as i64
            } else {
                a.time
            };
        }
    }

    if let Some(end) = anchors.anchors().last() {
        times[end.index] = end.time;
    }

    Ok(times)
}

/// Copy of `track` with every point timestamped. Elevation passes through.
pub fn interpolate_track(track: &[TrackPoint], anchors: &AnchorSet) -> Result<Vec<TrackPoint>> {
    let arc_lengths = cumulative_arc_lengths(track);
    let times = interpolate_times(&arc_lengths, anchors)?;
    Ok(track
        .iter()
        .zip(times)
        .map(|(p, t)| TrackPoint {
            time: Some(t),
            ..*p
        })
        .collect())
}
