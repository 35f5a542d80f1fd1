//! Planar geometry helpers.

use crate::TrackPoint;

/// Euclidean distance between two planar positions.
pub fn planar_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    planar_distance_2(a, b).sqrt()
}

/// Squared Euclidean distance (no sqrt), for spatial index queries.
pub fn planar_distance_2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    dx * dx + dy * dy
}

/// True if every value is strictly greater than the one before it.
///
/// Empty and single-element sequences are ascending.
pub fn is_strictly_ascending<T, I>(values: I) -> bool
where
    T: PartialOrd,
    I: IntoIterator<Item = T>,
{
    let mut iter = values.into_iter();
    let Some(mut last) = iter.next() else {
        return true;
    };
    for v in iter {
        if v <= last {
            return false;
        }
        last = v;
    }
    true
}

/// Calculate cumulative arc lengths along a track.
/// Returns a vector where `arc[i]` is the distance from the start to point `i`.
pub fn cumulative_arc_lengths(points: &[TrackPoint]) -> Vec<f64> {
    let mut arc = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += planar_distance(points[i - 1].xy(), p.xy());
        }
        arc.push(total);
    }
    arc
}

/// Total length of a track.
pub fn track_length(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| planar_distance(w[0].xy(), w[1].xy()))
        .sum()
}
