#![forbid(unsafe_code)]
//! village_layout: seeded procedural village layouts.
//!
//! Modules:
//! - geometry: points, polygons, segment distance and containment tests
//! - random: seeds and explicit-stream RNG helpers
//! - village: data model and the pipeline stages (roads, placement, walls, rural
//!   extension, assembly), plus options, catalog, interiors and events
//!
//! A layout is a pure function of `(seed, options)`:
//!
//! ```
//! use village_layout::prelude::*;
//!
//! let options = VillageOptions::new(Size::Tiny, Setting::Farming);
//! let layout = generate(1u64, &options).unwrap();
//! assert_eq!(layout, generate("1", &options).unwrap());
//! ```
pub mod error;
pub mod geometry;
pub mod random;
pub mod village;

/// Convenient re-exports for common types. Import with `use village_layout::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Polygon};
    pub use crate::random::Seed;
    pub use crate::village::catalog::{BuildingTemplate, BuildingType, RoadPreference};
    pub use crate::village::events::{
        EventSink, FnSink, MultiSink, VecSink, VillageEvent, VillageEventKind,
    };
    pub use crate::village::interior::{
        InteriorPlan, InteriorPlanner, InteriorRequest, InteriorRoom, SocialClass,
    };
    pub use crate::village::options::{Setting, Size, VillageOptions};
    pub use crate::village::placement::place_buildings;
    pub use crate::village::roads::build_roads;
    pub use crate::village::runner::{generate, VillageGenerator};
    pub use crate::village::rural::{extend_rural, RuralExtension};
    pub use crate::village::walls::{fit_walls, WallFit};
    pub use crate::village::{
        GenerationStats, RoadClass, VillageBuilding, VillageGate, VillageLayout, VillageRoad,
        VillageWall,
    };
}
