//! Perimeter wall and gate fitting.
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::geometry::polygon::bounding_box;
use crate::geometry::{heading, point_along, Polygon};
use crate::random::{chance, index, jitter, range};
use crate::village::events::{EventSink, VillageEvent, VillageEventKind};
use crate::village::options::Size;
use crate::village::{RoadClass, VillageBuilding, VillageGate, VillageRoad, VillageWall};

/// Vertices sampled around the wall.
pub const PERIMETER_SAMPLES: usize = 20;
/// Relative radius jitter per perimeter vertex.
pub const RADIUS_JITTER: f32 = 0.1;
/// Road endpoints this close to the perimeter become gate candidates.
pub const GATE_CANDIDATE_RADIUS: f32 = 25.0;
/// Accepted gates are strictly further apart than this.
pub const GATE_SPACING: f32 = 50.0;
/// Gate opening beyond the road width.
pub const GATE_MARGIN: f32 = 2.0;

const WALL_BUFFER: (f32, f32) = (15.0, 25.0);
const GROWTH: f32 = 1.05;
const MAX_GROWTH_STEPS: usize = 200;

/// Result of the wall stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallFit {
    /// Zero or one wall.
    pub walls: Vec<VillageWall>,
    /// The wall's single gate came from the fallback rule.
    pub gate_fallback: bool,
}

/// Decides whether the settlement is walled and, if so, fits the wall and its gates.
///
/// `include_walls` overrides the size-keyed roll; the stream is only drawn from when
/// it is `None`.
pub fn fit_walls<R: Rng + ?Sized>(
    buildings: &[VillageBuilding],
    roads: &[VillageRoad],
    size: Size,
    include_walls: Option<bool>,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> WallFit {
    let build = match include_walls {
        Some(forced) => forced,
        None => chance(rng, size.wall_probability()),
    };
    if !build {
        info!("No wall for this {} settlement.", size);
        if sink.wants(VillageEventKind::WallFitted) {
            sink.send(VillageEvent::WallFitted {
                built: false,
                gates: 0,
            });
        }
        return WallFit::default();
    }

    let sources: Vec<Vec2> = buildings
        .iter()
        .flat_map(|b| b.footprint.vertices.iter().copied())
        .chain(roads.iter().flat_map(|r| r.path.iter().copied()))
        .collect();
    let buffer = range(rng, WALL_BUFFER.0, WALL_BUFFER.1);
    let perimeter = enclose(&sources, buffer, rng);

    let mut gates = consolidate_gates(&perimeter, roads, size.gate_cap());
    let gate_fallback = gates.is_empty();
    if gate_fallback {
        if let Some(gate) = fallback_gate(&perimeter, roads, rng) {
            warn!(
                "No road exit near the wall; fallback gate at ({:.1}, {:.1}).",
                gate.position.x, gate.position.y
            );
            if sink.wants(VillageEventKind::GateFallback) {
                sink.send(VillageEvent::GateFallback {
                    position: gate.position,
                });
            }
            gates.push(gate);
        }
    }

    info!(
        "Wall: {} vertices, {} gate(s).",
        perimeter.len(),
        gates.len()
    );
    if sink.wants(VillageEventKind::WallFitted) {
        sink.send(VillageEvent::WallFitted {
            built: true,
            gates: gates.len(),
        });
    }

    WallFit {
        walls: vec![VillageWall {
            id: "wall_0".to_string(),
            perimeter,
            gates,
        }],
        gate_fallback,
    }
}

/// Irregular oval around `points`, grown until it contains every one of them.
pub fn enclose<R: Rng + ?Sized>(points: &[Vec2], buffer: f32, rng: &mut R) -> Polygon {
    let (lo, hi) = bounding_box(points.iter().copied()).unwrap_or((Vec2::ZERO, Vec2::ZERO));
    let center = (lo + hi) * 0.5;
    let half = (hi - lo) * 0.5 + Vec2::splat(buffer);

    let step = TAU / PERIMETER_SAMPLES as f32;
    let mut vertices: Vec<Vec2> = (0..PERIMETER_SAMPLES)
        .map(|i| {
            let a = i as f32 * step;
            let r = jitter(rng, 1.0, RADIUS_JITTER);
            center + Vec2::new(a.cos() * half.x, a.sin() * half.y) * r
        })
        .collect();

    for p in points {
        let mut steps = 0;
        while !Polygon::new(vertices.clone()).contains(*p) && steps < MAX_GROWTH_STEPS {
            let (i, j) = bracket(&vertices, center, *p);
            vertices[i] = center + (vertices[i] - center) * GROWTH;
            vertices[j] = center + (vertices[j] - center) * GROWTH;
            steps += 1;
        }
        if steps > 0 {
            debug!("Wall grown {} step(s) to enclose ({:.1}, {:.1}).", steps, p.x, p.y);
        }
    }

    Polygon::new(vertices)
}

/// Indices of the two perimeter vertices whose sector around `center` holds `p`.
///
/// Vertices must be ordered by polar angle starting at angle zero.
fn bracket(vertices: &[Vec2], center: Vec2, p: Vec2) -> (usize, usize) {
    let target = heading(p - center).rem_euclid(TAU);
    let i = vertices
        .iter()
        .rposition(|v| heading(*v - center).rem_euclid(TAU) <= target)
        .unwrap_or(vertices.len() - 1);
    (i, (i + 1) % vertices.len())
}

fn gate_at(perimeter: &Polygon, id: String, near: Vec2, road_width: f32) -> Option<VillageGate> {
    let (position, edge) = perimeter.closest_boundary_point(near)?;
    let (a, b) = perimeter.edge(edge)?;
    Some(VillageGate {
        id,
        position,
        angle: heading(b - a),
        width: road_width + GATE_MARGIN,
    })
}

/// Turns main/side road endpoints near the perimeter into spaced-out gates.
///
/// Main-road candidates are considered first; at most `cap` gates are kept.
pub fn consolidate_gates(
    perimeter: &Polygon,
    roads: &[VillageRoad],
    cap: usize,
) -> Vec<VillageGate> {
    let mut candidates: Vec<&VillageRoad> = roads
        .iter()
        .filter(|r| !r.rural && matches!(r.class, RoadClass::Main | RoadClass::Side))
        .collect();
    candidates.sort_by_key(|r| r.class);

    let mut gates: Vec<VillageGate> = Vec::with_capacity(cap);
    for road in candidates {
        for end in [road.start(), road.end()].into_iter().flatten() {
            if gates.len() >= cap {
                return gates;
            }
            if perimeter.boundary_distance(end) > GATE_CANDIDATE_RADIUS {
                continue;
            }
            let Some(gate) = gate_at(perimeter, format!("gate_{}", gates.len()), end, road.width)
            else {
                continue;
            };
            if gates
                .iter()
                .all(|g| g.position.distance(gate.position) > GATE_SPACING)
            {
                gates.push(gate);
            }
        }
    }
    gates
}

/// Single gate used when no road exit qualifies: the perimeter point nearest the
/// first main road's midpoint, else a random perimeter vertex.
pub fn fallback_gate<R: Rng + ?Sized>(
    perimeter: &Polygon,
    roads: &[VillageRoad],
    rng: &mut R,
) -> Option<VillageGate> {
    let id = "gate_0".to_string();
    let main = roads
        .iter()
        .find(|r| r.class == RoadClass::Main && !r.rural);
    if let Some(road) = main {
        let (mid, _) = point_along(&road.path, 0.5)?;
        return gate_at(perimeter, id, mid, road.width);
    }

    if perimeter.is_empty() {
        return None;
    }
    let i = index(rng, perimeter.len());
    let (a, b) = perimeter.edge(i)?;
    Some(VillageGate {
        id,
        position: a,
        angle: heading(b - a),
        width: RoadClass::Main.width() + GATE_MARGIN,
    })
}
