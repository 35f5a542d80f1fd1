//! Candidate generation: which track points could each photo belong to.
//!
//! A photo sitting beside a long straight stretch of track is close to many
//! consecutive points. Keeping all of them would blow up the assignment
//! search, so raw hits are merged greedily along the track: each stretch of
//! `window_span` arc length contributes at most one candidate, its closest
//! point.

use log::{debug, info};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::error::{OptionExt, Result};
use crate::geometry::{cumulative_arc_lengths, planar_distance, planar_distance_2};
use crate::{AlignConfig, Candidate, CandidateList, PhotoPoint, TrackPoint};

/// A track point with its index for R-tree queries
#[derive(Debug, Clone, Copy)]
pub struct IndexedPoint {
    pub idx: usize,
    pub x: f64,
    pub y: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        planar_distance_2([self.x, self.y], *point)
    }
}

/// Read-only view of a track shared by every photo's candidate search:
/// positions, cumulative arc lengths and a spatial index.
#[derive(Debug)]
pub struct TrackIndex {
    positions: Vec<[f64; 2]>,
    arc_lengths: Vec<f64>,
    rtree: RTree<IndexedPoint>,
}

impl TrackIndex {
    /// Build the index. Fails if the track has fewer than 2 points.
    pub fn new(track: &[TrackPoint]) -> Result<Self> {
        (track.len() >= 2)
            .then_some(())
            .ok_or_insufficient_points(track.len(), 2)?;

        let positions: Vec<[f64; 2]> = track.iter().map(TrackPoint::xy).collect();
        let arc_lengths = cumulative_arc_lengths(track);
        let indexed: Vec<IndexedPoint> = positions
            .iter()
            .enumerate()
            .map(|(idx, p)| IndexedPoint {
                idx,
                x: p[0],
                y: p[1],
            })
            .collect();

        Ok(Self {
            positions,
            arc_lengths,
            rtree: RTree::bulk_load(indexed),
        })
    }

    /// Number of track points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false: an index holds at least 2 points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc_lengths
    }

    pub fn total_length(&self) -> f64 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Every interior track point within `max_distance` of `position`,
    /// ordered by track index.
    ///
    /// The first and last track points are never hits: they are reserved
    /// for the track's own start and end times.
    pub fn raw_hits(&self, position: [f64; 2], max_distance: f64) -> Vec<Candidate> {
        let last = self.len() - 1;
        let mut hits: Vec<Candidate> = self
            .rtree
            .locate_within_distance(position, max_distance * max_distance)
            .filter(|p| p.idx != 0 && p.idx != last)
            .map(|p| Candidate {
                track_index: p.idx,
                arc_length: self.arc_lengths[p.idx],
                distance: planar_distance(self.positions[p.idx], position),
            })
            .collect();
        hits.sort_unstable_by_key(|c| c.track_index);
        hits
    }

    /// Candidate list for a single photo.
    pub fn candidates_for(&self, photo: &PhotoPoint, config: &AlignConfig) -> CandidateList {
        let hits = self.raw_hits(photo.xy(), config.max_photo_distance);
        merge_hits(hits, config.window_span)
    }
}

/// Greedily merge index-ordered raw hits into windows along the track.
///
/// A window is anchored at the arc length of its first hit. Later hits less
/// than `window_span` beyond the anchor replace the window's candidate only
/// if strictly closer; the first hit at or past the span opens a new window.
pub fn merge_hits<I>(hits: I, window_span: f64) -> CandidateList
where
    I: IntoIterator<Item = Candidate>,
{
    let mut merged: CandidateList = Vec::new();
    let mut window_anchor = f64::NEG_INFINITY;

    for hit in hits {
        match merged.last_mut() {
            Some(best) if hit.arc_length - window_anchor < window_span => {
                if hit.distance < best.distance {
                    *best = hit;
                }
            }
            _ => {
                window_anchor = hit.arc_length;
                merged.push(hit);
            }
        }
    }

    merged
}

/// Build one candidate list per photo.
pub fn generate_candidates(
    index: &TrackIndex,
    photos: &[PhotoPoint],
    config: &AlignConfig,
) -> Vec<CandidateList> {
    let lists: Vec<CandidateList> = photos
        .iter()
        .map(|photo| index.candidates_for(photo, config))
        .collect();
    log_candidates(&lists);
    lists
}

/// Build one candidate list per photo in parallel.
///
/// Same output as [`generate_candidates`]; only the read-only index is shared.
#[cfg(feature = "parallel")]
pub fn generate_candidates_parallel(
    index: &TrackIndex,
    photos: &[PhotoPoint],
    config: &AlignConfig,
) -> Vec<CandidateList> {
    use rayon::prelude::*;

    let lists: Vec<CandidateList> = photos
        .par_iter()
        .map(|photo| index.candidates_for(photo, config))
        .collect();
    log_candidates(&lists);
    lists
}

fn log_candidates(lists: &[CandidateList]) {
    for (i, list) in lists.iter().enumerate() {
        debug!(
            "[Candidates] Photo {} ({} candidates): {:?}",
            i,
            list.len(),
            list.iter()
                .map(|c| (c.track_index, c.arc_length, c.distance))
                .collect::<Vec<_>>()
        );
    }
    info!(
        "[Candidates] {} photos, {} candidates total",
        lists.len(),
        lists.iter().map(Vec::len).sum::<usize>()
    );
}
