//! Planar geometry used by every generation stage.
//!
//! Points are [`glam::Vec2`] in settlement units; the center of a settlement is the
//! origin unless stated otherwise. Angles are radians, counter-clockwise from +X.
use glam::Vec2;

pub mod polygon;

pub use polygon::Polygon;

/// A point or vector in settlement space.
pub type Point = Vec2;

/// Tolerance used for degenerate-length checks.
pub const EPSILON: f32 = 1e-6;

/// Heading of `v` in radians.
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector for `angle` radians.
#[inline]
pub fn unit(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Smallest angle between two undirected lines with the given headings, in `[0, PI/2]`.
pub fn line_angle(a: f32, b: f32) -> f32 {
    use std::f32::consts::PI;
    let d = wrap_angle(a - b).abs();
    if d > PI / 2.0 {
        PI - d
    } else {
        d
    }
}

/// Closest point to `p` on the segment `a..b`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Euclidean distance from `p` to the segment `a..b`.
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Whether segments `a1..a2` and `b1..b2` intersect, touching endpoints included.
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

/// Shortest distance between two segments; zero when they intersect.
pub fn segment_distance(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> f32 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }
    distance_to_segment(a1, b1, b2)
        .min(distance_to_segment(a2, b1, b2))
        .min(distance_to_segment(b1, a1, a2))
        .min(distance_to_segment(b2, a1, a2))
}

/// Point at parameter `t` in `[0, 1]` along a polyline, by arc length.
///
/// Returns the point and the index of the segment it lies on.
pub fn point_along(path: &[Vec2], t: f32) -> Option<(Vec2, usize)> {
    match path.len() {
        0 => None,
        1 => Some((path[0], 0)),
        _ => {
            let total: f32 = path.windows(2).map(|w| w[0].distance(w[1])).sum();
            let mut remaining = total * t.clamp(0.0, 1.0);
            for (i, w) in path.windows(2).enumerate() {
                let len = w[0].distance(w[1]);
                if remaining <= len || i == path.len() - 2 {
                    let local = if len > EPSILON {
                        (remaining / len).min(1.0)
                    } else {
                        0.0
                    };
                    return Some((w[0].lerp(w[1], local), i));
                }
                remaining -= len;
            }
            None
        }
    }
}

/// Total length of a polyline.
pub fn path_length(path: &[Vec2]) -> f32 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[inline]
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

#[inline]
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(2.0, 2.0), a, a), 8.0f32.sqrt());
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        ));
        assert!(!segments_intersect(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ));
        assert_eq!(
            segment_distance(
                Vec2::new(-1.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(-1.0, 1.0),
                Vec2::new(1.0, 1.0),
            ),
            1.0
        );
    }

    #[test]
    fn touching_endpoint_counts_as_intersection() {
        assert!(segments_intersect(
            Vec2::ZERO,
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 5.0),
        ));
    }

    #[test]
    fn line_angle_ignores_direction() {
        assert!((line_angle(0.0, PI) - 0.0).abs() < 1e-5);
        assert!((line_angle(0.0, FRAC_PI_2) - FRAC_PI_2).abs() < 1e-5);
        assert!((line_angle(0.1, PI - 0.1) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn point_along_walks_by_arc_length() {
        let path = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 30.0)];
        let (mid, seg) = point_along(&path, 0.5).unwrap();
        assert_eq!(seg, 1);
        assert!((mid - Vec2::new(10.0, 10.0)).length() < 1e-4);
        assert_eq!(point_along(&path, 1.0).unwrap().0, Vec2::new(10.0, 30.0));
        assert_eq!(path_length(&path), 40.0);
        assert!(point_along(&[], 0.5).is_none());
    }
}
