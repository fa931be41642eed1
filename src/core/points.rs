//! Point set for one analysis window.
//!
//! A window snapshot expands into one point per (channel, instant) pair.
//! The point space owns the points for exactly one window and answers
//! epsilon-radius neighbor queries over the (value, position) plane,
//! recording discovered pairs on both endpoints.

use crate::core::windowing::Sample;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// Index of a point within its owning [`PointSpace`].
pub type PointId = usize;

/// Density classification of a single reading.
///
/// Points start `Unknown` and leave the density pass as one of the other
/// three labels: Core marks a dense region, Border a point adjacent to a
/// core, Noise an outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Unknown,
    Noise,
    Border,
    Core,
}

/// One (value, position) reading extracted from a window snapshot.
#[derive(Debug, Clone)]
pub struct DataPoint {
    /// Scalar channel reading
    pub value: f64,
    /// Derived time coordinate of the instant this reading belongs to
    pub position: f64,
    /// Index of the instant (time slice) within the window
    pub instant: usize,
    /// Channel index within the instant
    pub channel: usize,
    /// Current classification
    pub label: Label,
    /// Ids of points discovered within epsilon of this one
    pub neighbors: HashSet<PointId>,
}

fn euclidean_dist(p: (f64, f64), q: (f64, f64)) -> f64 {
    ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt()
}

/// The full point set for one window snapshot.
///
/// Points are stored slice-major: the channels of instant 0 first, then
/// instant 1, and so on. Time slice boundaries are fixed by this
/// construction order, not by searching for equal positions.
#[derive(Debug, Clone)]
pub struct PointSpace {
    points: Vec<DataPoint>,
    channels: usize,
}

impl PointSpace {
    /// Expand a window snapshot into points.
    ///
    /// `stride` spaces consecutive instants along the position axis, so a
    /// point's position is `instant * stride`. All points start `Unknown`
    /// with no recorded neighbors.
    pub fn from_snapshot(snapshot: &[Sample], channels: usize, stride: f64) -> Self {
        let mut points = Vec::with_capacity(snapshot.len() * channels);
        for (instant, sample) in snapshot.iter().enumerate() {
            for (channel, &value) in sample.channels.iter().enumerate() {
                points.push(DataPoint {
                    value,
                    position: instant as f64 * stride,
                    instant,
                    channel,
                    label: Label::Unknown,
                    neighbors: HashSet::new(),
                });
            }
        }
        Self {
            points,
            channels: channels.max(1),
        }
    }

    /// Number of points in this window.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the window expanded to no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Borrow a point by id.
    pub fn point(&self, id: PointId) -> &DataPoint {
        &self.points[id]
    }

    /// All points in construction order.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Overwrite the label of one point.
    pub fn set_label(&mut self, id: PointId, label: Label) {
        self.points[id].label = label;
    }

    /// Number of time slices in this window.
    pub fn slice_count(&self) -> usize {
        (self.points.len() + self.channels - 1) / self.channels
    }

    /// Ids of the points forming one time slice, in channel order.
    pub fn slice_ids(&self, slice: usize) -> Range<PointId> {
        let start = (slice * self.channels).min(self.points.len());
        let end = (start + self.channels).min(self.points.len());
        start..end
    }

    /// Every other point within `epsilon` of `id`.
    ///
    /// Distance is Euclidean over (value, position); points with the exact
    /// same value are never neighbors. Each discovered pair is recorded
    /// symmetrically on both points, and repeated queries do not duplicate
    /// entries.
    pub fn neighbors_within(&mut self, id: PointId, epsilon: f64) -> Vec<PointId> {
        let origin = (self.points[id].value, self.points[id].position);
        let mut found = Vec::new();
        for (other, point) in self.points.iter().enumerate() {
            if other == id || point.value == origin.0 {
                continue;
            }
            if euclidean_dist(origin, (point.value, point.position)) <= epsilon {
                found.push(other);
            }
        }
        for &other in &found {
            self.points[id].neighbors.insert(other);
            self.points[other].neighbors.insert(id);
        }
        found
    }

    /// True when any id in `found` shares `id`'s exact position, i.e. the
    /// reading is corroborated by another channel at the same instant.
    pub fn has_vertical_neighbor(&self, id: PointId, found: &[PointId]) -> bool {
        let position = self.points[id].position;
        found.iter().any(|&other| self.points[other].position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_slice_space() -> PointSpace {
        // Instants at positions 0.0 and 0.45
        let snapshot = vec![
            Sample::new(vec![1.0, 1.1]),
            Sample::new(vec![1.2, 9.0]),
        ];
        PointSpace::from_snapshot(&snapshot, 2, 0.45)
    }

    #[test]
    fn test_construction_is_slice_major() {
        let space = two_slice_space();
        assert_eq!(space.len(), 4);
        assert_eq!(space.slice_count(), 2);
        assert_eq!(space.slice_ids(0), 0..2);
        assert_eq!(space.slice_ids(1), 2..4);

        let p = space.point(2);
        assert_eq!(p.value, 1.2);
        assert_eq!(p.instant, 1);
        assert_eq!(p.channel, 0);
        assert_eq!(p.position, 0.45);
        assert_eq!(p.label, Label::Unknown);
        assert!(p.neighbors.is_empty());
    }

    #[test]
    fn test_neighbor_discovery_and_memoization() {
        let mut space = two_slice_space();

        // (1.0, 0.0): same-slice 1.1 at distance 0.1, cross-slice 1.2 at
        // sqrt(0.04 + 0.2025) ~ 0.49, far-off 9.0 excluded.
        let found = space.neighbors_within(0, 0.5);
        let mut found_sorted = found.clone();
        found_sorted.sort_unstable();
        assert_eq!(found_sorted, vec![1, 2]);

        // Both endpoints recorded the pair.
        assert!(space.point(0).neighbors.contains(&1));
        assert!(space.point(1).neighbors.contains(&0));
        assert!(space.point(2).neighbors.contains(&0));

        // Re-querying finds the same points without duplicating entries.
        let again = space.neighbors_within(0, 0.5);
        assert_eq!(again.len(), 2);
        assert_eq!(space.point(0).neighbors.len(), 2);
    }

    #[test]
    fn test_neighbor_relation_is_symmetric() {
        let mut space = two_slice_space();
        for id in 0..space.len() {
            space.neighbors_within(id, 0.5);
        }
        for a in 0..space.len() {
            for &b in &space.point(a).neighbors.clone() {
                assert!(
                    space.point(b).neighbors.contains(&a),
                    "pair ({a}, {b}) recorded on one endpoint only"
                );
            }
        }
    }

    #[test]
    fn test_equal_values_are_never_neighbors() {
        let snapshot = vec![Sample::new(vec![2.0, 2.0, 2.1])];
        let mut space = PointSpace::from_snapshot(&snapshot, 3, 0.45);

        let found = space.neighbors_within(0, 1.0);
        assert_eq!(found, vec![2]);
    }

    #[test]
    fn test_vertical_neighbor_check() {
        let mut space = two_slice_space();
        let found = space.neighbors_within(0, 0.5);
        assert!(space.has_vertical_neighbor(0, &found));

        // 1.2's in-range points all sit in the previous slice (1.0 and 1.1
        // at distance ~0.49 and ~0.46); its slice-mate 9.0 is far out of
        // range, so there is no same-instant corroboration.
        let mut found = space.neighbors_within(2, 0.5);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
        assert!(!space.has_vertical_neighbor(2, &found));
    }
}
