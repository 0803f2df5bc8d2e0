//! Time-stamped anchor samples, oldest first.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: Vec3,
    /// Seconds on the host's monotonic clock.
    pub created_at: f64,
}

/// Ordered point buffer. Pushes go to the tail and eviction drains the
/// head, so `created_at` is non-decreasing front to back as long as callers
/// feed a monotonic clock.
#[derive(Debug, Clone, Default)]
pub struct PointHistory {
    points: VecDeque<TrailPoint>,
}

impl PointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TrailPoint> + DoubleEndedIterator {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }

    pub fn oldest(&self) -> Option<&TrailPoint> {
        self.points.front()
    }

    pub fn push(&mut self, point: TrailPoint) {
        self.points.push_back(point);
    }

    /// Drops every head point with `now - created_at >= lifetime` and returns
    /// how many were removed.
    pub fn evict_expired(&mut self, now: f64, lifetime: f32) -> usize {
        let lifetime = f64::from(lifetime);
        let expired = self
            .points
            .iter()
            .take_while(|p| now - p.created_at >= lifetime)
            .count();
        self.points.drain(..expired);
        expired
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Clears and gives the backing storage back.
    pub fn release(&mut self) {
        self.points = VecDeque::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, t: f64) -> TrailPoint {
        TrailPoint {
            position: Vec3::new(x, 0.0, 0.0),
            created_at: t,
        }
    }

    #[test]
    fn evicts_contiguous_head_run() {
        let mut history = PointHistory::new();
        for i in 0..5 {
            history.push(at(i as f32, i as f64 * 0.5));
        }
        assert_eq!(history.evict_expired(2.0, 1.0), 3);
        assert_eq!(history.len(), 2);
        assert_eq!(history.oldest().unwrap().created_at, 1.5);
        assert_eq!(history.newest().unwrap().created_at, 2.0);
    }

    #[test]
    fn eviction_boundary_is_inclusive() {
        let mut history = PointHistory::new();
        history.push(at(0.0, 0.0));
        assert_eq!(history.evict_expired(0.999, 1.0), 0);
        assert_eq!(history.evict_expired(1.0, 1.0), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn non_positive_lifetime_evicts_everything() {
        let mut history = PointHistory::new();
        history.push(at(0.0, 3.0));
        history.push(at(1.0, 3.0));
        assert_eq!(history.evict_expired(3.0, 0.0), 2);

        history.push(at(0.0, 4.0));
        assert_eq!(history.evict_expired(4.0, -1.0), 1);
    }
}
