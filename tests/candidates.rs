//! Tests for candidates module

use trackstamp::candidates::*;
use trackstamp::{AlignConfig, AlignError, Candidate, PhotoPoint, TrackPoint};

fn scenario_track() -> Vec<TrackPoint> {
    (0..5).map(|i| TrackPoint::new(0.0, i as f64 * 50.0)).collect()
}

/// Straight east-west line from x=0 to x=1000, one point every 10 units.
fn straight_line() -> Vec<TrackPoint> {
    (0..=100).map(|i| TrackPoint::new(i as f64 * 10.0, 0.0)).collect()
}

fn hit(track_index: usize, arc_length: f64, distance: f64) -> Candidate {
    Candidate {
        track_index,
        arc_length,
        distance,
    }
}

#[test]
fn test_scenario_single_candidate() {
    let index = TrackIndex::new(&scenario_track()).unwrap();
    let photo = PhotoPoint::new(1_000, 5.0, 100.0);

    let candidates = index.candidates_for(&photo, &AlignConfig::default());
    assert_eq!(candidates, vec![hit(2, 100.0, 5.0)]);
}

#[test]
fn test_track_index_requires_two_points() {
    let err = TrackIndex::new(&[TrackPoint::new(0.0, 0.0)]).unwrap_err();
    assert_eq!(
        err,
        AlignError::InsufficientTrackPoints {
            point_count: 1,
            minimum_required: 2
        }
    );
}

#[test]
fn test_track_index_arc_lengths() {
    let index = TrackIndex::new(&scenario_track()).unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(index.arc_lengths(), &[0.0, 50.0, 100.0, 150.0, 200.0]);
    assert_eq!(index.total_length(), 200.0);
}

#[test]
fn test_raw_hits_ordered_by_index() {
    let index = TrackIndex::new(&straight_line()).unwrap();
    let hits = index.raw_hits([500.0, 0.0], 50.0);

    let indices: Vec<usize> = hits.iter().map(|c| c.track_index).collect();
    assert_eq!(indices, (45..=55).collect::<Vec<_>>());
    // Threshold is inclusive
    assert_eq!(hits.last().unwrap().distance, 50.0);
}

#[test]
fn test_straight_line_one_candidate_per_window() {
    let index = TrackIndex::new(&straight_line()).unwrap();
    let config = AlignConfig::default();

    // Hits span x=460..540, all inside one 100-unit window
    let offset = index.candidates_for(&PhotoPoint::new(0, 500.0, 10.0), &config);
    assert_eq!(offset.len(), 1);
    assert_eq!(offset[0].track_index, 50);
    assert_eq!(offset[0].distance, 10.0);

    // Hits span x=450..550 exactly: the hit at 550 opens a second window
    let on_line = index.candidates_for(&PhotoPoint::new(0, 500.0, 0.0), &config);
    assert_eq!(on_line, vec![hit(50, 500.0, 0.0), hit(55, 550.0, 50.0)]);
}

#[test]
fn test_far_photo_has_no_candidates() {
    let index = TrackIndex::new(&scenario_track()).unwrap();
    let photo = PhotoPoint::new(0, 500.0, 500.0);
    assert!(
        index
            .candidates_for(&photo, &AlignConfig::default())
            .is_empty()
    );
}

#[test]
fn test_boundary_points_never_candidates() {
    let index = TrackIndex::new(&scenario_track()).unwrap();
    let config = AlignConfig::default();

    // Sits on the first point; the next point is 50 away and wins instead
    let at_start = index.candidates_for(&PhotoPoint::new(0, 0.0, 0.0), &config);
    assert_eq!(at_start, vec![hit(1, 50.0, 50.0)]);

    let at_end = index.candidates_for(&PhotoPoint::new(0, 0.0, 210.0), &config);
    assert!(at_end.is_empty());
}

#[test]
fn test_out_and_back_gives_candidate_per_pass() {
    let mut track = straight_line();
    let back: Vec<TrackPoint> = track.iter().rev().skip(1).copied().collect();
    track.extend(back);

    let index = TrackIndex::new(&track).unwrap();
    let candidates = index.candidates_for(&PhotoPoint::new(0, 300.0, 5.0), &AlignConfig::default());

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].track_index, 30);
    assert_eq!(candidates[1].track_index, 170);
    assert!(candidates[0].arc_length < candidates[1].arc_length);
}

#[test]
fn test_merge_window_anchored_at_first_hit() {
    // 60 replaces 0 as the best, but the window stays anchored at arc 0,
    // so 110 opens a new window.
    let hits = vec![hit(1, 0.0, 10.0), hit(2, 60.0, 5.0), hit(3, 110.0, 1.0)];
    let merged = merge_hits(hits, 100.0);
    assert_eq!(merged, vec![hit(2, 60.0, 5.0), hit(3, 110.0, 1.0)]);
}

#[test]
fn test_merge_tie_keeps_first() {
    let hits = vec![hit(1, 0.0, 5.0), hit(2, 10.0, 5.0)];
    assert_eq!(merge_hits(hits, 100.0), vec![hit(1, 0.0, 5.0)]);
}

#[test]
fn test_merge_empty() {
    assert!(merge_hits(Vec::new(), 100.0).is_empty());
}

#[test]
fn test_shrunken_config() {
    let track: Vec<TrackPoint> = (0..=20).map(|i| TrackPoint::new(i as f64, 0.0)).collect();
    let index = TrackIndex::new(&track).unwrap();
    let config = AlignConfig {
        max_photo_distance: 5.0,
        window_span: 3.0,
        ..AlignConfig::default()
    };

    // Hits at x=5..=15, windows [5,8) [8,11) [11,14) [14,15]
    let candidates = index.candidates_for(&PhotoPoint::new(0, 10.0, 0.0), &config);
    let indices: Vec<usize> = candidates.iter().map(|c| c.track_index).collect();
    assert_eq!(indices, vec![7, 10, 11, 14]);
}

#[test]
fn test_generate_candidates_per_photo() {
    let index = TrackIndex::new(&scenario_track()).unwrap();
    let photos = vec![
        PhotoPoint::new(10, 5.0, 50.0),
        PhotoPoint::new(20, 500.0, 0.0),
        PhotoPoint::new(30, -3.0, 150.0),
    ];
    let lists = generate_candidates(&index, &photos, &AlignConfig::default());

    assert_eq!(lists.len(), 3);
    assert_eq!(lists[0], vec![hit(1, 50.0, 5.0)]);
    assert!(lists[1].is_empty());
    assert_eq!(lists[2], vec![hit(3, 150.0, 3.0)]);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let index = TrackIndex::new(&straight_line()).unwrap();
    let photos: Vec<PhotoPoint> = (0..40)
        .map(|i| PhotoPoint::new(i, i as f64 * 25.0, (i % 7) as f64 * 6.0))
        .collect();
    let config = AlignConfig::default();

    assert_eq!(
        generate_candidates(&index, &photos, &config),
        generate_candidates_parallel(&index, &photos, &config)
    );
}
