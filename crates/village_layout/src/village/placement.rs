//! Building placement: bounded-retry constructive search along the road network.
//!
//! Each building type gets up to [`MAX_ATTEMPTS`] tries. A try picks a road (biased by
//! the type's road preference), a point on it, and tests the footprint on both sides
//! of the road. The first footprint clear of bounds, other buildings and roads wins.
//! A type that exhausts its tries is dropped; placement never fails a run.
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use crate::geometry::{heading, unit, Polygon};
use crate::random::{chance, choose, index, jitter, rand01, range};
use crate::village::catalog::{BuildingTemplate, BuildingType, RoadPreference};
use crate::village::events::{EventSink, VillageEvent, VillageEventKind};
use crate::village::roads::random_road_of;
use crate::village::{RoadClass, VillageBuilding, VillageRoad};

/// Tries per building type before it is dropped.
pub const MAX_ATTEMPTS: usize = 30;
/// Gap kept between a road edge and any footprint.
pub const ROAD_BUFFER: f32 = 2.0;
/// Relative footprint size jitter.
pub const SIZE_JITTER: f32 = 0.1;
/// Largest random extra setback.
pub const SETBACK_JITTER: f32 = 3.0;
/// Main road segments, counted from the center, the anchor may front onto.
pub const ANCHOR_SEGMENTS: usize = 2;

const BOUNDS_VERTICES: usize = 12;

/// Where along the network a building may look for frontage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frontage {
    /// Any road, picked by the type's preference.
    #[default]
    Anywhere,
    /// Inner segments of main roads only.
    NearCenter,
}

/// Irregular 12-gon around `center` that buildings must stay inside.
pub fn settlement_bounds<R: Rng + ?Sized>(
    center: Vec2,
    radius: f32,
    rng: &mut R,
) -> Polygon {
    let step = TAU / BOUNDS_VERTICES as f32;
    let vertices = (0..BOUNDS_VERTICES)
        .map(|i| center + unit(i as f32 * step) * radius * range(rng, 1.15, 1.40))
        .collect();
    Polygon::new(vertices)
}

/// Footprint and door for a building fronting a road at `anchor`.
///
/// `tangent` is the road heading, `side` is +1 (left) or -1 (right) and `offset` the
/// distance from the centerline to the footprint center. `size.x` runs along the road.
pub fn footprint_at(
    anchor: Vec2,
    tangent: f32,
    side: f32,
    offset: f32,
    size: Vec2,
) -> (Polygon, Vec2) {
    let normal = unit(tangent).perp() * side;
    let center = anchor + normal * offset;
    let entry = anchor + normal * (offset - size.y * 0.5);
    (Polygon::oriented_rect(center, size, tangent), entry)
}

/// Centerline-to-center distance for a footprint of `depth` beside a road of `width`.
pub fn setback_distance<R: Rng + ?Sized>(
    template: &BuildingTemplate,
    road_width: f32,
    depth: f32,
    rng: &mut R,
) -> f32 {
    road_width * 0.5
        + ROAD_BUFFER
        + depth * 0.5
        + template.setback
        + range(rng, 0.0, SETBACK_JITTER)
}

/// Why a candidate footprint was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutOfBounds,
    TooClose,
    Overlap,
    OnRoad,
}

/// Checks a candidate footprint against bounds, placed buildings and roads.
pub fn check_candidate(
    building_type: BuildingType,
    footprint: &Polygon,
    bounds: &Polygon,
    placed: &[VillageBuilding],
    roads: &[VillageRoad],
) -> Result<(), Rejection> {
    if !footprint.vertices.iter().all(|v| bounds.contains(*v)) {
        return Err(Rejection::OutOfBounds);
    }

    let center = footprint.centroid();
    let spacing = building_type.template().min_spacing;
    for other in placed {
        if other.center().distance(center) < spacing {
            return Err(Rejection::TooClose);
        }
        // Vertex containment only; crossing quads with no vertex inside slip through.
        if footprint.overlaps_by_vertices(&other.footprint) {
            return Err(Rejection::Overlap);
        }
    }

    if roads
        .iter()
        .any(|r| r.distance_to(footprint) < r.clearance() + ROAD_BUFFER)
    {
        return Err(Rejection::OnRoad);
    }

    Ok(())
}

fn pick_road<'a, R: Rng + ?Sized>(
    template: &BuildingTemplate,
    roads: &'a [VillageRoad],
    frontage: Frontage,
    rng: &mut R,
) -> Option<&'a VillageRoad> {
    if frontage == Frontage::NearCenter {
        if let Some(road) = random_road_of(roads, RoadClass::Main, rng) {
            return Some(road);
        }
    }
    match template.road {
        RoadPreference::Prefer { class, probability } if chance(rng, probability) => {
            random_road_of(roads, class, rng).or_else(|| choose(rng, roads))
        }
        _ => choose(rng, roads),
    }
}

/// Searches for a footprint for `building_type`.
///
/// Returns the building and the 1-based attempt that found it, or `None` after
/// [`MAX_ATTEMPTS`] failures.
pub fn place_building<R: Rng + ?Sized>(
    id: &str,
    building_type: BuildingType,
    roads: &[VillageRoad],
    bounds: &Polygon,
    placed: &[VillageBuilding],
    frontage: Frontage,
    rng: &mut R,
) -> Option<(VillageBuilding, usize)> {
    let template = building_type.template();
    let size = template.size * jitter(rng, 1.0, SIZE_JITTER);

    for attempt in 1..=MAX_ATTEMPTS {
        let road = pick_road(&template, roads, frontage, rng)?;
        let segments = road.path.len().saturating_sub(1);
        if segments == 0 {
            continue;
        }
        let limit = match frontage {
            Frontage::NearCenter if road.class == RoadClass::Main => {
                segments.min(ANCHOR_SEGMENTS)
            }
            _ => segments,
        };
        let seg = index(rng, limit);
        let (a, b) = (road.path[seg], road.path[seg + 1]);
        let anchor = a.lerp(b, rand01(rng));
        let tangent = heading(b - a);
        let offset = setback_distance(&template, road.width, size.y, rng);

        let first = if chance(rng, 0.5) { 1.0 } else { -1.0 };
        for side in [first, -first] {
            let (footprint, entry) = footprint_at(anchor, tangent, side, offset, size);
            if check_candidate(building_type, &footprint, bounds, placed, roads).is_ok() {
                let building = VillageBuilding {
                    id: id.to_string(),
                    building_type,
                    footprint,
                    entry,
                    interior: None,
                    rural: false,
                };
                return Some((building, attempt));
            }
        }
    }

    None
}

/// Places `types` in order, each against everything placed before it.
///
/// `existing` buildings are obstacles and also offset the id counter. Only newly
/// placed buildings are returned; dropped types show up as
/// [`VillageEvent::PlacementExhausted`].
pub fn place_buildings<R: Rng + ?Sized>(
    types: &[BuildingType],
    roads: &[VillageRoad],
    bounds: &Polygon,
    existing: &[VillageBuilding],
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Vec<VillageBuilding> {
    let mut all: Vec<VillageBuilding> = existing.to_vec();
    for &building_type in types {
        let id = format!("building_{}", all.len());
        place_one(
            &id,
            building_type,
            roads,
            bounds,
            &mut all,
            Frontage::Anywhere,
            rng,
            sink,
        );
    }
    all.split_off(existing.len())
}

/// Places the settlement's focal building on an inner main road segment.
pub fn place_anchor<R: Rng + ?Sized>(
    anchor: BuildingType,
    roads: &[VillageRoad],
    bounds: &Polygon,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Option<VillageBuilding> {
    let mut placed = Vec::with_capacity(1);
    place_one(
        "building_0",
        anchor,
        roads,
        bounds,
        &mut placed,
        Frontage::NearCenter,
        rng,
        sink,
    );
    placed.pop()
}

#[allow(clippy::too_many_arguments)]
fn place_one<R: Rng + ?Sized>(
    id: &str,
    building_type: BuildingType,
    roads: &[VillageRoad],
    bounds: &Polygon,
    placed: &mut Vec<VillageBuilding>,
    frontage: Frontage,
    rng: &mut R,
    sink: &mut dyn EventSink,
) {
    match place_building(id, building_type, roads, bounds, placed, frontage, rng) {
        Some((building, attempts)) => {
            debug!(
                "Placed {} '{}' after {} attempt(s).",
                building_type, building.id, attempts
            );
            if sink.wants(VillageEventKind::BuildingPlaced) {
                sink.send(VillageEvent::BuildingPlaced {
                    id: building.id.clone(),
                    building_type,
                    attempts,
                });
            }
            placed.push(building);
        }
        None => {
            warn!(
                "Dropped {} after {} placement attempts.",
                building_type, MAX_ATTEMPTS
            );
            if sink.wants(VillageEventKind::PlacementExhausted) {
                sink.send(VillageEvent::PlacementExhausted {
                    building_type,
                    attempts: MAX_ATTEMPTS,
                });
            }
        }
    }
}
