//! Road network: radiating main roads, connecting side roads, dead-end paths.
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::geometry::{heading, line_angle, unit, wrap_angle};
use crate::random::{choose, chance, index, int_inclusive, range, symmetric};
use crate::village::options::Size;
use crate::village::{RoadClass, VillageRoad};

/// Segments per main road.
pub const MAIN_ROAD_SEGMENTS: usize = 4;
/// Largest angular deviation from even spacing.
pub const MAIN_ROAD_JITTER: f32 = FRAC_PI_6;
/// Peak lateral offset of the sinusoidal bend.
pub const MAIN_ROAD_CURVE: f32 = 7.5;
/// Shallowest allowed angle between a side road and the main road it leaves.
pub const MIN_JUNCTION_ANGLE: f32 = FRAC_PI_6;

/// Fraction of a segment a dead-end path may branch from, keeping clear of its ends.
const BRANCH_SPAN: (f32, f32) = (0.1, 0.9);

/// Builds the village road network around `center`.
///
/// Roads are returned main first, then side roads, then paths.
pub fn build_roads<R: Rng + ?Sized>(
    center: Vec2,
    size: Size,
    main_roads: usize,
    rng: &mut R,
) -> Vec<VillageRoad> {
    let mut roads = main_roads_from(center, size.radius(), main_roads.clamp(1, 4), rng);
    let side = side_roads(&roads, rng);
    roads.extend(side);
    let paths = dead_end_paths(&roads, rng);
    roads.extend(paths);
    debug!(
        "Road network: {} roads around ({:.1}, {:.1}).",
        roads.len(),
        center.x,
        center.y
    );
    roads
}

fn main_roads_from<R: Rng + ?Sized>(
    center: Vec2,
    radius: f32,
    count: usize,
    rng: &mut R,
) -> Vec<VillageRoad> {
    let rotation = range(rng, 0.0, TAU);
    let spacing = TAU / count as f32;

    (0..count)
        .map(|i| {
            let angle = rotation + i as f32 * spacing + symmetric(rng, MAIN_ROAD_JITTER);
            let length = radius * range(rng, 0.80, 0.95);
            let dir = unit(angle);
            let normal = dir.perp();

            let mut path = Vec::with_capacity(MAIN_ROAD_SEGMENTS + 1);
            path.push(center);
            for k in 1..=MAIN_ROAD_SEGMENTS {
                let t = k as f32 / MAIN_ROAD_SEGMENTS as f32;
                let bend = (t * PI).sin() * symmetric(rng, MAIN_ROAD_CURVE);
                path.push(center + dir * (length * t) + normal * bend);
            }
            VillageRoad::new(format!("main_road_{i}"), path, RoadClass::Main)
        })
        .collect()
}

/// Local direction of `path` around vertex `i`.
pub(crate) fn tangent_at(path: &[Vec2], i: usize) -> f32 {
    let prev = path[i.saturating_sub(1)];
    let next = path[(i + 1).min(path.len() - 1)];
    heading(next - prev)
}

/// Heading leaving a junction on a road with `tangent`, aimed at `desired`,
/// turned away from the road until it makes at least [`MIN_JUNCTION_ANGLE`].
pub fn junction_heading(tangent: f32, desired: f32) -> f32 {
    if line_angle(desired, tangent) >= MIN_JUNCTION_ANGLE {
        return desired;
    }
    let along = if wrap_angle(desired - tangent).abs() <= FRAC_PI_2 {
        tangent
    } else {
        tangent + PI
    };
    let side = if wrap_angle(desired - along) < 0.0 {
        -1.0
    } else {
        1.0
    };
    wrap_angle(along + side * MIN_JUNCTION_ANGLE)
}

fn side_roads<R: Rng + ?Sized>(mains: &[VillageRoad], rng: &mut R) -> Vec<VillageRoad> {
    if mains.len() < 2 {
        return Vec::new();
    }

    let count = int_inclusive(rng, 1, 3);
    let mut out = Vec::with_capacity(count);
    for s in 0..count {
        let i = index(rng, mains.len());
        let mut j = index(rng, mains.len() - 1);
        if j >= i {
            j += 1;
        }
        let (from, to) = (&mains[i].path, &mains[j].path);
        let ai = int_inclusive(rng, 1, from.len() - 2);
        let bi = int_inclusive(rng, 1, to.len() - 2);
        let (a, b) = (from[ai], to[bi]);
        let dist = a.distance(b);
        if dist < 1.0 {
            continue;
        }

        let desired = heading(b - a) + symmetric(rng, 0.15);
        let departure = junction_heading(tangent_at(from, ai), desired);
        let control = a + unit(departure) * (dist * 0.5);
        out.push(VillageRoad::new(
            format!("side_road_{s}"),
            vec![a, control, b],
            RoadClass::Side,
        ));
    }
    out
}

fn dead_end_paths<R: Rng + ?Sized>(roads: &[VillageRoad], rng: &mut R) -> Vec<VillageRoad> {
    let count = int_inclusive(rng, 1, 3);
    let mut out: Vec<VillageRoad> = Vec::with_capacity(count);
    for k in 0..count {
        let pool_len = roads.len() + out.len();
        if pool_len == 0 {
            break;
        }
        let pick = index(rng, pool_len);
        let source = if pick < roads.len() {
            &roads[pick].path
        } else {
            &out[pick - roads.len()].path
        };
        if source.len() < 2 {
            continue;
        }
        let seg = index(rng, source.len() - 1);
        let (a, b) = (source[seg], source[seg + 1]);
        let origin = a.lerp(b, range(rng, BRANCH_SPAN.0, BRANCH_SPAN.1));
        let tangent = heading(b - a);

        let side = if chance(rng, 0.5) { 1.0 } else { -1.0 };
        let angle = tangent + side * FRAC_PI_2 + symmetric(rng, FRAC_PI_6);
        let length = range(rng, 10.0, 25.0);
        let path = vec![origin, origin + unit(angle) * length];
        out.push(VillageRoad::new(format!("path_{k}"), path, RoadClass::Path));
    }
    out
}

/// Picks a uniformly random road of `class`, if any.
pub fn random_road_of<'a, R: Rng + ?Sized>(
    roads: &'a [VillageRoad],
    class: RoadClass,
    rng: &mut R,
) -> Option<&'a VillageRoad> {
    let of_class: Vec<&VillageRoad> = roads.iter().filter(|r| r.class == class).collect();
    choose(rng, &of_class).copied()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::{distance_to_segment, path_length};

    fn of_class(roads: &[VillageRoad], class: RoadClass) -> Vec<&VillageRoad> {
        roads.iter().filter(|r| r.class == class).collect()
    }

    #[test]
    fn main_roads_radiate_from_center() {
        for (size, count) in [(Size::Tiny, 2), (Size::Small, 3), (Size::Medium, 4)] {
            let mut rng = StdRng::seed_from_u64(17);
            let center = Vec2::new(5.0, -3.0);
            let roads = build_roads(center, size, count, &mut rng);
            let mains = of_class(&roads, RoadClass::Main);
            assert_eq!(mains.len(), count);
            for road in mains {
                assert_eq!(road.path.len(), MAIN_ROAD_SEGMENTS + 1);
                assert_eq!(road.path[0], center);
                assert_eq!(road.width, 6.0);
                let reach = road.end().unwrap().distance(center);
                assert!(reach >= size.radius() * 0.79 && reach <= size.radius() * 0.96);
            }
        }
    }

    #[test]
    fn main_road_headings_stay_near_even_spacing() {
        let mut rng = StdRng::seed_from_u64(3);
        let roads = build_roads(Vec2::ZERO, Size::Medium, 4, &mut rng);
        let mut headings: Vec<f32> = of_class(&roads, RoadClass::Main)
            .iter()
            .map(|r| heading(r.end().unwrap()).rem_euclid(TAU))
            .collect();
        headings.sort_by(f32::total_cmp);
        for w in headings.windows(2) {
            // Even spacing is 90 degrees; two opposite 30 degree jitters close it to 30.
            assert!(w[1] - w[0] > 0.4, "roads too close: {headings:?}");
        }
    }

    #[test]
    fn side_roads_join_two_main_roads_at_interior_points() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let roads = build_roads(Vec2::ZERO, Size::Small, 3, &mut rng);
            let mains = of_class(&roads, RoadClass::Main);
            let sides = of_class(&roads, RoadClass::Side);
            assert!((1..=3).contains(&sides.len()));
            for side in sides {
                let a = side.start().unwrap();
                let b = side.end().unwrap();
                let host_a = mains
                    .iter()
                    .position(|m| m.path[1..m.path.len() - 1].contains(&a))
                    .expect("start on a main road interior point");
                let host_b = mains
                    .iter()
                    .position(|m| m.path[1..m.path.len() - 1].contains(&b))
                    .expect("end on a main road interior point");
                assert_ne!(host_a, host_b);
            }
        }
    }

    #[test]
    fn side_road_junctions_are_never_shallow() {
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let roads = build_roads(Vec2::ZERO, Size::Medium, 3, &mut rng);
            let mains = of_class(&roads, RoadClass::Main);
            for side in of_class(&roads, RoadClass::Side) {
                let a = side.path[0];
                let host = mains
                    .iter()
                    .find(|m| m.path.contains(&a))
                    .expect("host road");
                let at = host.path.iter().position(|p| *p == a).unwrap();
                let tangent = tangent_at(&host.path, at);
                let leave = heading(side.path[1] - a);
                assert!(line_angle(leave, tangent) >= MIN_JUNCTION_ANGLE - 1e-4);
            }
        }
    }

    #[test]
    fn junction_heading_nudges_only_shallow_angles() {
        assert_eq!(junction_heading(0.0, 1.0), 1.0);
        let nudged = junction_heading(0.0, 0.1);
        assert!((nudged - MIN_JUNCTION_ANGLE).abs() < 1e-5);
        let back = junction_heading(0.0, PI - 0.1);
        assert!((line_angle(back, 0.0) - MIN_JUNCTION_ANGLE).abs() < 1e-5);
        assert!(wrap_angle(back - PI).abs() < FRAC_PI_2);
    }

    #[test]
    fn single_main_road_gets_no_side_roads() {
        let mut rng = StdRng::seed_from_u64(8);
        let roads = build_roads(Vec2::ZERO, Size::Tiny, 1, &mut rng);
        assert_eq!(of_class(&roads, RoadClass::Main).len(), 1);
        assert!(of_class(&roads, RoadClass::Side).is_empty());
        assert!(!of_class(&roads, RoadClass::Path).is_empty());
    }

    #[test]
    fn paths_are_short_dead_ends() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let roads = build_roads(Vec2::ZERO, Size::Tiny, 2, &mut rng);
            let paths = of_class(&roads, RoadClass::Path);
            assert!((1..=3).contains(&paths.len()));
            for path in paths {
                assert_eq!(path.path.len(), 2);
                assert_eq!(path.width, 2.0);
                let len = path_length(&path.path);
                assert!((10.0 - 1e-3..25.0 + 1e-3).contains(&len));
                let origin = path.path[0];
                assert!(roads.iter().filter(|r| r.id != path.id).any(|r| {
                    r.path
                        .windows(2)
                        .any(|w| distance_to_segment(origin, w[0], w[1]) < 1e-3)
                }));
                // Paths branch off mid-segment, never from another path's tip.
                for other in of_class(&roads, RoadClass::Path) {
                    if other.id != path.id {
                        assert!(other.path[1].distance(origin) > 1e-3, "{}", path.id);
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_same_network() {
        let a = build_roads(Vec2::ZERO, Size::Small, 3, &mut StdRng::seed_from_u64(99));
        let b = build_roads(Vec2::ZERO, Size::Small, 3, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
