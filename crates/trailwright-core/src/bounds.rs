//! Axis-aligned bounds and frustum visibility.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
///
/// Invariant: `min <= max` component-wise.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// # Panics
    /// Panics if any component of `min` is greater than its counterpart in `max`.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        assert!(min.cmple(max).all(), "invalid AABB: min > max");
        Self { min, max }
    }

    /// Zero-volume box at `p`.
    #[must_use]
    pub fn point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::point(first), |acc, p| acc.including(p)))
    }

    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when the box has no volume along every axis.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    #[must_use]
    pub fn including(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// Inclusive on faces.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Six inward-facing planes (`xyz` normal, `w` distance) extracted from a
/// view-projection matrix. Uses the `[0, 1]` clip depth range glam's
/// `perspective_rh`/`orthographic_rh` produce.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    pub fn from_view_projection(m: &Mat4) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        let r3 = m.row(3);
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(|p| {
            let len = p.truncate().length();
            if len > 0.0 {
                p / len
            } else {
                p
            }
        });
        Self { planes }
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// Conservative test: may report boxes just outside a corner as visible,
    /// never hides a visible one.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let n = plane.truncate();
            // box corner furthest along the plane normal
            let positive = Vec3::select(n.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            n.dot(positive) + plane.w >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Frustum {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn from_points_covers_all() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(aabb.min(), Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max(), Vec3::new(1.0, 3.0, 0.5));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn point_box_is_degenerate() {
        let aabb = Aabb::point(Vec3::ONE);
        assert!(aabb.is_degenerate());
        assert!(aabb.contains(Vec3::ONE));
        assert_eq!(aabb.extents(), Vec3::ZERO);
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(1.5), Vec3::splat(2.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    #[should_panic(expected = "invalid AABB")]
    fn inverted_box_panics() {
        let _ = Aabb::new(Vec3::ONE, Vec3::ZERO);
    }

    #[test]
    fn frustum_accepts_box_in_front() {
        let frustum = camera();
        assert!(frustum.intersects_aabb(&Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))));
    }

    #[test]
    fn frustum_rejects_box_behind_camera() {
        let frustum = camera();
        let behind = Aabb::new(Vec3::new(-0.5, -0.5, 20.0), Vec3::new(0.5, 0.5, 21.0));
        assert!(!frustum.intersects_aabb(&behind));
    }

    #[test]
    fn frustum_rejects_box_far_to_the_side() {
        let frustum = camera();
        let side = Aabb::new(Vec3::new(50.0, -0.5, -0.5), Vec3::new(51.0, 0.5, 0.5));
        assert!(!frustum.intersects_aabb(&side));
    }

    #[test]
    fn frustum_accepts_degenerate_box_inside() {
        assert!(camera().intersects_aabb(&Aabb::point(Vec3::ZERO)));
    }
}
