//! Seam to the external interior generator.
//!
//! When `procedural_buildings` is set, the runner asks an [`InteriorPlanner`] for one
//! plan per building after the layout is complete. Interior seeds are derived from the
//! run seed and the building id, so interiors never perturb the layout stream.
use glam::UVec2;

use crate::geometry::Polygon;
use crate::random::derive_seed;
use crate::village::catalog::BuildingType;
use crate::village::VillageBuilding;

/// Side length of one interior tile in settlement units.
pub const TILE_SIZE: f32 = 1.0;

/// Wealth bracket that drives interior furnishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SocialClass {
    Poor,
    Common,
    Wealthy,
}

/// What the planner is asked to lay out.
#[derive(Debug, Clone, PartialEq)]
pub struct InteriorRequest {
    pub building_id: String,
    pub building_type: BuildingType,
    pub social_class: SocialClass,
    pub seed: u64,
    /// Footprint in whole tiles: x along the frontage, y in depth.
    pub footprint_tiles: UVec2,
}

/// A room rectangle in tile coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteriorRoom {
    pub name: String,
    pub origin: UVec2,
    pub size: UVec2,
}

/// Interior plan returned by a planner and attached to its building.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteriorPlan {
    pub footprint_tiles: UVec2,
    pub social_class: SocialClass,
    pub seed: u64,
    pub rooms: Vec<InteriorRoom>,
}

/// External interior generator.
pub trait InteriorPlanner {
    /// Returns `None` when the planner has nothing for this building.
    fn plan(&mut self, request: &InteriorRequest) -> Option<InteriorPlan>;
}

impl<F> InteriorPlanner for F
where
    F: FnMut(&InteriorRequest) -> Option<InteriorPlan>,
{
    fn plan(&mut self, request: &InteriorRequest) -> Option<InteriorPlan> {
        self(request)
    }
}

/// Footprint edge lengths rounded to whole tiles, at least one each.
pub fn footprint_tiles(footprint: &Polygon) -> UVec2 {
    if footprint.len() < 3 {
        return UVec2::ONE;
    }
    let (Some((a, b)), Some((_, c))) = (footprint.edge(0), footprint.edge(1)) else {
        return UVec2::ONE;
    };
    let tiles = |len: f32| ((len / TILE_SIZE).round() as u32).max(1);
    UVec2::new(tiles(a.distance(b)), tiles(b.distance(c)))
}

/// Builds the request for `building`, `None` for types without interiors.
pub fn request_for(building: &VillageBuilding, run_seed: u64) -> Option<InteriorRequest> {
    if !building.building_type.has_interior() {
        return None;
    }
    let template = building.building_type.template();
    let social_class = if building.rural {
        SocialClass::Poor
    } else {
        template.social_class
    };
    Some(InteriorRequest {
        building_id: building.id.clone(),
        building_type: building.building_type,
        social_class,
        seed: derive_seed(run_seed, &building.id),
        footprint_tiles: footprint_tiles(&building.footprint),
    })
}

/// Attaches plans to every building the planner answers for. Returns how many.
pub(crate) fn attach_interiors(
    buildings: &mut [VillageBuilding],
    run_seed: u64,
    planner: &mut dyn InteriorPlanner,
) -> usize {
    let mut attached = 0;
    for building in buildings.iter_mut() {
        let Some(request) = request_for(building, run_seed) else {
            continue;
        };
        building.interior = planner.plan(&request);
        attached += usize::from(building.interior.is_some());
    }
    attached
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn building(id: &str, building_type: BuildingType, rural: bool) -> VillageBuilding {
        VillageBuilding {
            id: id.into(),
            building_type,
            footprint: Polygon::oriented_rect(Vec2::ZERO, Vec2::new(8.4, 5.6), 0.4),
            entry: Vec2::ZERO,
            interior: None,
            rural,
        }
    }

    fn single_room(request: &InteriorRequest) -> Option<InteriorPlan> {
        Some(InteriorPlan {
            footprint_tiles: request.footprint_tiles,
            social_class: request.social_class,
            seed: request.seed,
            rooms: vec![InteriorRoom {
                name: "hall".into(),
                origin: UVec2::ZERO,
                size: request.footprint_tiles,
            }],
        })
    }

    #[test]
    fn tiles_round_rotated_edges() {
        let b = building("b", BuildingType::House, false);
        assert_eq!(footprint_tiles(&b.footprint), UVec2::new(8, 6));
        let sliver = Polygon::oriented_rect(Vec2::ZERO, Vec2::new(0.2, 0.2), 0.0);
        assert_eq!(footprint_tiles(&sliver), UVec2::ONE);
    }

    #[test]
    fn wells_get_no_request() {
        assert!(request_for(&building("w", BuildingType::Well, false), 1).is_none());
    }

    #[test]
    fn seeds_depend_on_run_seed_and_id() {
        let a = request_for(&building("a", BuildingType::Inn, false), 1).unwrap();
        let b = request_for(&building("b", BuildingType::Inn, false), 1).unwrap();
        let a2 = request_for(&building("a", BuildingType::Inn, false), 2).unwrap();
        assert_ne!(a.seed, b.seed);
        assert_ne!(a.seed, a2.seed);
        assert_eq!(a.social_class, SocialClass::Wealthy);
        let rural = request_for(&building("r", BuildingType::Inn, true), 1).unwrap();
        assert_eq!(rural.social_class, SocialClass::Poor);
    }

    #[test]
    fn closures_act_as_planners() {
        let mut buildings = vec![
            building("a", BuildingType::House, false),
            building("w", BuildingType::Well, false),
        ];
        let mut calls = 0;
        let mut planner = |req: &InteriorRequest| {
            calls += 1;
            single_room(req)
        };
        let attached = attach_interiors(&mut buildings, 9, &mut planner);
        assert_eq!(attached, 1);
        assert_eq!(calls, 1);
        assert_eq!(buildings[0].interior.as_ref().unwrap().rooms.len(), 1);
        assert!(buildings[1].interior.is_none());
    }
}
