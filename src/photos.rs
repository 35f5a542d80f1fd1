//! Photo preparation before alignment.
//!
//! Photos outside the hike's start/end window can't be anchors, and a burst
//! of shots taken within a couple of minutes at one viewpoint would compete
//! for the same stretch of track. Both are handled here.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::PhotoPoint;

/// Configuration for burst clustering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoClusterConfig {
    /// A photo taken at most this many seconds after the previous one joins
    /// its cluster.
    /// Default: 150 (2.5 minutes)
    pub time_gap_secs: i64,
}

impl Default for PhotoClusterConfig {
    fn default() -> Self {
        Self { time_gap_secs: 150 }
    }
}

/// A burst of photos reduced to one representative photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoCluster {
    /// Mean time (truncated to whole seconds) and mean position
    pub photo: PhotoPoint,
    /// Number of photos merged into this cluster
    pub photo_count: usize,
}

/// Photos taken within `[start_time, end_time]`, sorted by time.
pub fn photos_in_window(photos: &[PhotoPoint], start_time: i64, end_time: i64) -> Vec<PhotoPoint> {
    let mut kept: Vec<PhotoPoint> = photos
        .iter()
        .filter(|p| (start_time..=end_time).contains(&p.time))
        .copied()
        .collect();
    kept.sort_by_key(|p| p.time);

    if kept.len() < photos.len() {
        debug!(
            "[Photos] Dropped {} of {} photos outside {}..={}",
            photos.len() - kept.len(),
            photos.len(),
            start_time,
            end_time
        );
    }
    kept
}

/// Cluster photos taken in quick succession.
///
/// Photos are sorted by time, then a new cluster starts whenever the gap to
/// the previous photo exceeds `time_gap_secs`.
pub fn cluster_photo_bursts(photos: &[PhotoPoint], config: &PhotoClusterConfig) -> Vec<PhotoCluster> {
    let mut sorted = photos.to_vec();
    sorted.sort_by_key(|p| p.time);

    let mut bursts: Vec<Vec<PhotoPoint>> = Vec::new();
    for photo in sorted {
        match bursts.last_mut() {
            Some(burst)
                if burst
                    .last()
                    .is_some_and(|prev| photo.time - prev.time <= config.time_gap_secs) =>
            {
                burst.push(photo);
            }
            _ => bursts.push(vec![photo]),
        }
    }

    let clusters: Vec<PhotoCluster> = bursts.iter().map(|burst| summarize(burst)).collect();
    debug!(
        "[Photos] Clustered {} photos into {} bursts",
        photos.len(),
        clusters.len()
    );
    clusters
}

fn summarize(burst: &[PhotoPoint]) -> PhotoCluster {
    let n = burst.len();
    let time = burst.iter().map(|p| p.time as i128).sum::<i128>() / n as i128;
    let x = burst.iter().map(|p| p.x).sum::<f64>() / n as f64;
    let y = burst.iter().map(|p| p.y).sum::<f64>() / n as f64;
    PhotoCluster {
        photo: PhotoPoint::new(time as i64, x, y),
        photo_count: n,
    }
}
