//! Rural extension: main roads continued through their gates into the countryside.
//!
//! Outlying buildings are scattered beside each extension without collision checks;
//! rural density is low enough that overlaps are rare and tolerated.
use glam::Vec2;
use rand::Rng;
use tracing::info;

use crate::geometry::{heading, point_along, unit};
use crate::random::{chance, choose, int_inclusive, jitter, range, symmetric};
use crate::village::catalog::RURAL_POOL;
use crate::village::events::{EventSink, VillageEvent, VillageEventKind};
use crate::village::placement::{footprint_at, SIZE_JITTER};
use crate::village::{RoadClass, VillageBuilding, VillageRoad, VillageWall};

/// Largest distance between a main road end and the gate it runs through.
pub const GATE_MATCH_RADIUS: f32 = 30.0;
pub const EXTENSION_SEGMENTS: usize = 4;
/// Per-segment heading drift, radians.
pub const HEADING_DRIFT: f32 = 0.25;

const EXTENSION_LENGTH: (f32, f32) = (60.0, 100.0);
const LATERAL_OFFSET: (f32, f32) = (15.0, 25.0);
const ALONG: (f32, f32) = (0.15, 0.95);

/// Roads and buildings added outside the wall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuralExtension {
    pub roads: Vec<VillageRoad>,
    pub buildings: Vec<VillageBuilding>,
}

impl RuralExtension {
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty() && self.buildings.is_empty()
    }
}

/// Extends main roads past the wall gates they end near.
///
/// Does nothing without a wall. Each gate carries at most one extension.
pub fn extend_rural<R: Rng + ?Sized>(
    roads: &[VillageRoad],
    walls: &[VillageWall],
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> RuralExtension {
    let mut out = RuralExtension::default();
    let Some(wall) = walls.first() else {
        return out;
    };

    let mut used = vec![false; wall.gates.len()];
    let mains = roads
        .iter()
        .filter(|r| r.class == RoadClass::Main && !r.rural && r.path.len() >= 2);
    for road in mains {
        let n = road.path.len();
        let (before, end) = (road.path[n - 2], road.path[n - 1]);

        let nearest = wall
            .gates
            .iter()
            .enumerate()
            .filter(|(i, g)| !used[*i] && g.position.distance(end) <= GATE_MATCH_RADIUS)
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(end)
                    .total_cmp(&b.position.distance_squared(end))
            });
        let Some((gate_idx, gate)) = nearest else {
            continue;
        };
        used[gate_idx] = true;

        let k = out.roads.len() / 2;
        out.roads.push(
            VillageRoad::new(
                format!("rural_connector_{k}"),
                vec![end, gate.position],
                RoadClass::Main,
            )
            .with_rural(true),
        );

        let path = extension_path(gate.position, heading(end - before), rng);
        for _ in 0..int_inclusive(rng, 1, 3) {
            let id = format!("rural_building_{}", out.buildings.len());
            if let Some(building) = rural_building(id, &path, rng) {
                out.buildings.push(building);
            }
        }
        out.roads.push(
            VillageRoad::new(format!("rural_road_{k}"), path, RoadClass::Main).with_rural(true),
        );
    }

    info!(
        "Rural extension: {} road(s), {} building(s).",
        out.roads.len(),
        out.buildings.len()
    );
    if sink.wants(VillageEventKind::RuralExtended) {
        sink.send(VillageEvent::RuralExtended {
            roads: out.roads.len(),
            buildings: out.buildings.len(),
        });
    }
    out
}

/// Drifting polyline of [`EXTENSION_SEGMENTS`] equal segments starting at `start`.
pub fn extension_path<R: Rng + ?Sized>(
    start: Vec2,
    heading0: f32,
    rng: &mut R,
) -> Vec<Vec2> {
    let length = range(rng, EXTENSION_LENGTH.0, EXTENSION_LENGTH.1);
    let step = length / EXTENSION_SEGMENTS as f32;

    let mut path = Vec::with_capacity(EXTENSION_SEGMENTS + 1);
    path.push(start);
    let (mut at, mut h) = (start, heading0);
    for _ in 0..EXTENSION_SEGMENTS {
        h += symmetric(rng, HEADING_DRIFT);
        at += unit(h) * step;
        path.push(at);
    }
    path
}

fn rural_building<R: Rng + ?Sized>(
    id: String,
    path: &[Vec2],
    rng: &mut R,
) -> Option<VillageBuilding> {
    let building_type = *choose(rng, &RURAL_POOL)?;
    let (anchor, seg) = point_along(path, range(rng, ALONG.0, ALONG.1))?;
    let tangent = heading(path[seg + 1] - path[seg]);
    let side = if chance(rng, 0.5) { 1.0 } else { -1.0 };
    let offset = range(rng, LATERAL_OFFSET.0, LATERAL_OFFSET.1);
    let size = building_type.template().size * jitter(rng, 1.0, SIZE_JITTER);
    let (footprint, entry) = footprint_at(anchor, tangent, side, offset, size);

    Some(VillageBuilding {
        id,
        building_type,
        footprint,
        entry,
        interior: None,
        rural: true,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::{path_length, Polygon};
    use crate::village::events::VecSink;
    use crate::village::VillageGate;

    fn walled(gates: Vec<Vec2>) -> VillageWall {
        VillageWall {
            id: "wall_0".into(),
            perimeter: Polygon::oriented_rect(Vec2::ZERO, Vec2::splat(200.0), 0.0),
            gates: gates
                .into_iter()
                .enumerate()
                .map(|(i, position)| VillageGate {
                    id: format!("gate_{i}"),
                    position,
                    angle: 0.0,
                    width: 8.0,
                })
                .collect(),
        }
    }

    fn main_road(id: &str, end: Vec2) -> VillageRoad {
        VillageRoad::new(id, vec![Vec2::ZERO, end * 0.5, end], RoadClass::Main)
    }

    #[test]
    fn no_wall_no_extension() {
        let roads = [main_road("main_road_0", Vec2::new(95.0, 0.0))];
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink = VecSink::new();
        let ext = extend_rural(&roads, &[], &mut rng, &mut sink);
        assert!(ext.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn extension_runs_through_the_gate() {
        let roads = [main_road("main_road_0", Vec2::new(95.0, 0.0))];
        let wall = walled(vec![Vec2::new(100.0, 0.0)]);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ext = extend_rural(&roads, std::slice::from_ref(&wall), &mut rng, &mut ());
            assert_eq!(ext.roads.len(), 2);
            let connector = &ext.roads[0];
            assert_eq!(connector.id, "rural_connector_0");
            assert_eq!(connector.path, vec![Vec2::new(95.0, 0.0), Vec2::new(100.0, 0.0)]);

            let road = &ext.roads[1];
            assert_eq!(road.id, "rural_road_0");
            assert!(road.rural && connector.rural);
            assert_eq!(road.path.len(), EXTENSION_SEGMENTS + 1);
            assert_eq!(road.path[0], Vec2::new(100.0, 0.0));
            let len = path_length(&road.path);
            assert!((60.0 - 1e-3..100.0 + 1e-3).contains(&len), "{len}");
            // Drift is bounded, so the road keeps heading outward.
            assert!(road.end().unwrap().x > 100.0);

            assert!((1..=3).contains(&ext.buildings.len()));
            for b in &ext.buildings {
                assert!(b.rural);
                assert!(RURAL_POOL.contains(&b.building_type));
                assert!(b.id.starts_with("rural_building_"));
            }
        }
    }

    #[test]
    fn far_gates_are_ignored() {
        let roads = [main_road("main_road_0", Vec2::new(60.0, 0.0))];
        let wall = walled(vec![Vec2::new(100.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(3);
        let ext = extend_rural(&roads, &[wall], &mut rng, &mut ());
        assert!(ext.is_empty());
    }

    #[test]
    fn each_gate_is_extended_once() {
        let roads = [
            main_road("main_road_0", Vec2::new(95.0, 0.0)),
            main_road("main_road_1", Vec2::new(95.0, 5.0)),
        ];
        let wall = walled(vec![Vec2::new(100.0, 0.0)]);
        let mut rng = StdRng::seed_from_u64(4);
        let mut sink = VecSink::new();
        let ext = extend_rural(&roads, &[wall], &mut rng, &mut sink);
        assert_eq!(ext.roads.len(), 2);
        assert_eq!(
            sink.as_slice(),
            &[VillageEvent::RuralExtended {
                roads: 2,
                buildings: ext.buildings.len(),
            }]
        );
    }

    #[test]
    fn rural_buildings_sit_beside_their_road() {
        let mut rng = StdRng::seed_from_u64(9);
        let path = extension_path(Vec2::ZERO, 0.0, &mut rng);
        for n in 0..20 {
            let b = rural_building(format!("rural_building_{n}"), &path, &mut rng)
                .expect("path is long enough");
            let d = path
                .windows(2)
                .map(|w| crate::geometry::distance_to_segment(b.center(), w[0], w[1]))
                .fold(f32::INFINITY, f32::min);
            assert!(d <= 25.0 + 1e-3);
        }
    }
}
