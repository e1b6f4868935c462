//! Village layout generation: data model and pipeline stages.
//!
//! A run threads one seeded stream through the stages in a fixed order:
//! anchor selection, [`roads`], [`placement`], [`walls`], [`rural`], then assembly in
//! [`runner`]. The result is an immutable [`VillageLayout`].
use glam::Vec2;

use crate::geometry::polygon::bounding_box;
use crate::geometry::Polygon;
use crate::village::catalog::BuildingType;
use crate::village::interior::InteriorPlan;
use crate::village::options::{Setting, Size};

pub mod catalog;
pub mod events;
pub mod interior;
pub mod options;
pub mod placement;
pub mod roads;
pub mod runner;
pub mod rural;
pub mod walls;

/// Road hierarchy, widest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoadClass {
    Main,
    Side,
    Path,
}

impl RoadClass {
    /// Carriageway width in settlement units.
    pub fn width(self) -> f32 {
        match self {
            RoadClass::Main => 6.0,
            RoadClass::Side => 4.0,
            RoadClass::Path => 2.0,
        }
    }
}

/// A road as an ordered centerline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VillageRoad {
    pub id: String,
    pub path: Vec<Vec2>,
    pub class: RoadClass,
    pub width: f32,
    /// Built outside the wall by the rural extension.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rural: bool,
}

impl VillageRoad {
    pub fn new(id: impl Into<String>, path: Vec<Vec2>, class: RoadClass) -> Self {
        Self {
            id: id.into(),
            path,
            class,
            width: class.width(),
            rural: false,
        }
    }

    pub fn with_rural(mut self, rural: bool) -> Self {
        self.rural = rural;
        self
    }

    /// Consecutive centerline segments.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn start(&self) -> Option<Vec2> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<Vec2> {
        self.path.last().copied()
    }

    /// Shortest distance from a polygon to the centerline.
    pub fn distance_to(&self, polygon: &Polygon) -> f32 {
        self.segments()
            .map(|(a, b)| polygon.distance_to_segment(a, b))
            .fold(f32::INFINITY, f32::min)
    }

    /// Distance a footprint must keep from the centerline.
    pub fn clearance(&self) -> f32 {
        self.width * 0.5
    }
}

/// A placed building.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VillageBuilding {
    pub id: String,
    pub building_type: BuildingType,
    /// Convex quadrilateral, counter-clockwise.
    pub footprint: Polygon,
    /// Door position on the edge facing the access road.
    pub entry: Vec2,
    /// Interior plan from an external planner, when requested.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interior: Option<InteriorPlan>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rural: bool,
}

impl VillageBuilding {
    pub fn center(&self) -> Vec2 {
        self.footprint.centroid()
    }
}

/// A gate in a wall.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VillageGate {
    pub id: String,
    /// Point on the wall perimeter.
    pub position: Vec2,
    /// Heading of the wall edge at the gate, radians.
    pub angle: f32,
    pub width: f32,
}

/// Perimeter wall with its gates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VillageWall {
    pub id: String,
    pub perimeter: Polygon,
    pub gates: Vec<VillageGate>,
}

/// Counters describing how a run went.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Village buildings asked for, anchor included.
    pub requested_buildings: usize,
    /// Village buildings actually placed.
    pub placed_buildings: usize,
    /// Types dropped after exhausting their placement attempts.
    pub dropped_buildings: usize,
    /// A wall was fitted but no road exit qualified as a gate.
    pub gate_fallback: bool,
    pub rural_buildings: usize,
}

/// The generated settlement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VillageLayout {
    pub seed: u64,
    pub size: Size,
    pub setting: Setting,
    pub center: Vec2,
    /// Area buildings are placed in.
    pub bounds: Polygon,
    pub roads: Vec<VillageRoad>,
    pub buildings: Vec<VillageBuilding>,
    /// Zero or one wall.
    pub walls: Vec<VillageWall>,
    pub stats: GenerationStats,
}

impl VillageLayout {
    pub fn wall(&self) -> Option<&VillageWall> {
        self.walls.first()
    }

    pub fn village_buildings(&self) -> impl Iterator<Item = &VillageBuilding> + '_ {
        self.buildings.iter().filter(|b| !b.rural)
    }

    pub fn rural_buildings(&self) -> impl Iterator<Item = &VillageBuilding> + '_ {
        self.buildings.iter().filter(|b| b.rural)
    }

    pub fn village_roads(&self) -> impl Iterator<Item = &VillageRoad> + '_ {
        self.roads.iter().filter(|r| !r.rural)
    }

    pub fn rural_roads(&self) -> impl Iterator<Item = &VillageRoad> + '_ {
        self.roads.iter().filter(|r| r.rural)
    }

    pub fn roads_of(&self, class: RoadClass) -> impl Iterator<Item = &VillageRoad> + '_ {
        self.village_roads().filter(move |r| r.class == class)
    }

    /// Axis-aligned corners enclosing every coordinate in the layout.
    pub fn extent(&self) -> (Vec2, Vec2) {
        let points = self
            .bounds
            .vertices
            .iter()
            .chain(self.roads.iter().flat_map(|r| r.path.iter()))
            .chain(self.buildings.iter().flat_map(|b| b.footprint.vertices.iter()))
            .chain(self.walls.iter().flat_map(|w| w.perimeter.vertices.iter()))
            .copied();
        bounding_box(points).unwrap_or((self.center, self.center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn road_defaults_width_from_class() {
        let road = VillageRoad::new("r", vec![Vec2::ZERO, Vec2::X], RoadClass::Side);
        assert_eq!(road.width, 4.0);
        assert_eq!(road.clearance(), 2.0);
        assert!(!road.rural);
        assert_eq!(road.segments().count(), 1);
    }

    #[test]
    fn road_distance_uses_nearest_segment() {
        let road = VillageRoad::new(
            "r",
            vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            RoadClass::Main,
        );
        let hut = Polygon::oriented_rect(Vec2::new(14.0, 5.0), Vec2::splat(2.0), 0.0);
        assert!((road.distance_to(&hut) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn road_classes_order_main_first() {
        let mut classes = vec![RoadClass::Path, RoadClass::Main, RoadClass::Side];
        classes.sort();
        assert_eq!(classes, vec![RoadClass::Main, RoadClass::Side, RoadClass::Path]);
    }
}
