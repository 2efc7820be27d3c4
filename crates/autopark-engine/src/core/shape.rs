//! Oriented rectangles and convex-polygon overlap.
//!
//! Every solid thing in a scenario (car body, obstacle, parking spot) is an
//! [`OrientedRect`]. Collision between two of them is decided by
//! [`polygons_overlap`], an implementation of the Separating Axis Theorem.

use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

/// A rectangle of `width` x `height` centered at `center` and rotated by `angle`
/// degrees (0 = the `height` side is vertical, clockwise positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Vec2,
    pub angle: f32,
    pub width: f32,
    pub height: f32,
}

impl OrientedRect {
    #[must_use]
    pub const fn new(center: Vec2, angle: f32, width: f32, height: f32) -> Self {
        Self {
            center,
            angle,
            width,
            height,
        }
    }

    /// Corners in the order front-left, front-right, rear-right, rear-left.
    ///
    /// "Front" is the `-y` side of the unrotated rectangle, which is the side
    /// the heading vector points at. Consecutive corners (wrapping around) form
    /// the rectangle's edges.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
        .map(|offset| self.center + offset.rotated(self.angle))
    }

    /// The larger of the two side lengths.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        f32::max(self.width, self.height)
    }
}

/// Anything that occupies an oriented rectangle in the scenario.
pub trait Collidable {
    fn footprint(&self) -> OrientedRect;

    fn corners(&self) -> [Vec2; 4] {
        self.footprint().corners()
    }

    fn overlaps<C>(&self, other: &C) -> bool
    where
        C: Collidable + ?Sized,
    {
        polygons_overlap(&self.corners(), &other.corners())
    }
}

impl Collidable for OrientedRect {
    fn footprint(&self) -> OrientedRect {
        *self
    }
}

/// Separating Axis Theorem test for two convex polygons.
///
/// Each polygon is given as its vertices in winding order. Every edge normal of
/// both polygons is tried as a separating axis; zero-length edges are skipped.
/// Touching intervals count as overlapping.
///
/// ```
/// use autopark_engine::{OrientedRect, Vec2, polygons_overlap};
///
/// let a = OrientedRect::new(Vec2::new(0.0, 0.0), 0.0, 10.0, 10.0);
/// let b = OrientedRect::new(Vec2::new(8.0, 0.0), 45.0, 10.0, 10.0);
/// let c = OrientedRect::new(Vec2::new(30.0, 0.0), 0.0, 10.0, 10.0);
/// assert!(polygons_overlap(&a.corners(), &b.corners()));
/// assert!(!polygons_overlap(&a.corners(), &c.corners()));
/// ```
#[must_use]
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    [a, b]
        .into_iter()
        .flat_map(edge_normals)
        .all(|axis| intervals_overlap(project(a, axis), project(b, axis)))
}

fn edge_normals(polygon: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = polygon.len();
    (0..n).filter_map(move |i| {
        let edge = polygon[(i + 1) % n] - polygon[i];
        let normal = edge.perp();
        let len = normal.length();
        (len > 0.0).then(|| normal.scale(len.recip()))
    })
}

fn project(polygon: &[Vec2], axis: Vec2) -> (f32, f32) {
    polygon
        .iter()
        .map(|p| axis.dot(*p))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        })
}

fn intervals_overlap((min_a, max_a): (f32, f32), (min_b, max_b): (f32, f32)) -> bool {
    !(max_a < min_b || max_b < min_a)
}
