//! Closed polygons: footprints, settlement bounds and wall perimeters.
use glam::Vec2;
use mint::Point2;

use crate::geometry::{closest_point_on_segment, segment_distance, EPSILON};

/// Ordered, implicitly closed vertex list.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Rectangle of `size` (x along `angle`, y across it) centered on `center`.
    ///
    /// Vertices are counter-clockwise.
    pub fn oriented_rect(center: Vec2, size: Vec2, angle: f32) -> Self {
        let half = size * 0.5;
        let rot = Vec2::from_angle(angle);
        let corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];
        Self {
            vertices: corners.iter().map(|c| center + rot.rotate(*c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Ray-casting containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        let v = &self.vertices;
        let mut inside = false;
        let mut j = v.len().wrapping_sub(1);
        for i in 0..v.len() {
            let (vi, vj) = (v[i], v[j]);
            if (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// True when any vertex of either polygon lies inside the other.
    ///
    /// Two convex shapes that cross without a vertex landing inside the other
    /// are not detected.
    pub fn overlaps_by_vertices(&self, other: &Polygon) -> bool {
        self.vertices.iter().any(|v| other.contains(*v))
            || other.vertices.iter().any(|v| self.contains(*v))
    }

    /// Vertex average.
    pub fn centroid(&self) -> Vec2 {
        if self.vertices.is_empty() {
            return Vec2::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec2>() / self.vertices.len() as f32
    }

    /// Signed shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f32 {
        self.edges().map(|(a, b)| a.perp_dot(b)).sum::<f32>() * 0.5
    }

    /// Axis-aligned `(min, max)` corners, `None` when empty.
    pub fn bounding_box(&self) -> Option<(Vec2, Vec2)> {
        bounding_box(self.vertices.iter().copied())
    }

    /// Strict convexity with consistent winding and no repeated vertices.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut sign = 0.0f32;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let cross = (b - a).perp_dot(c - b);
            if cross.abs() <= EPSILON {
                return false;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Shortest distance from the polygon (area included) to the segment `a..b`.
    ///
    /// Zero when the segment touches, crosses or lies inside the polygon.
    pub fn distance_to_segment(&self, a: Vec2, b: Vec2) -> f32 {
        if self.contains(a) || self.contains(b) {
            return 0.0;
        }
        self.edges()
            .map(|(p, q)| segment_distance(p, q, a, b))
            .fold(f32::INFINITY, f32::min)
    }

    /// Closest point on the boundary to `p`, with the index of its edge.
    pub fn closest_boundary_point(&self, p: Vec2) -> Option<(Vec2, usize)> {
        self.edges()
            .enumerate()
            .map(|(i, (a, b))| (closest_point_on_segment(p, a, b), i))
            .min_by(|(x, _), (y, _)| x.distance_squared(p).total_cmp(&y.distance_squared(p)))
    }

    /// Distance from `p` to the boundary.
    pub fn boundary_distance(&self, p: Vec2) -> f32 {
        self.closest_boundary_point(p)
            .map(|(q, _)| q.distance(p))
            .unwrap_or(f32::INFINITY)
    }

    /// Edge `index` (wrapping) as `(start, end)`, `None` for an empty polygon.
    pub fn edge(&self, index: usize) -> Option<(Vec2, Vec2)> {
        let n = self.vertices.len();
        if n == 0 {
            return None;
        }
        Some((self.vertices[index % n], self.vertices[(index + 1) % n]))
    }
}

/// Axis-aligned `(min, max)` corners of a point set.
pub fn bounding_box(points: impl IntoIterator<Item = Vec2>) -> Option<(Vec2, Vec2)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

impl From<Vec<Vec2>> for Polygon {
    fn from(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }
}

impl From<&Polygon> for Vec<Point2<f32>> {
    fn from(polygon: &Polygon) -> Self {
        polygon.vertices.iter().map(|v| (*v).into()).collect()
    }
}

impl From<Vec<Point2<f32>>> for Polygon {
    fn from(points: Vec<Point2<f32>>) -> Self {
        Self {
            vertices: points.into_iter().map(Vec2::from).collect(),
        }
    }
}
