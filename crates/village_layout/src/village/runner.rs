//! Settlement assembly: runs every stage on one seeded stream and packages the result.
use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::random::{int_inclusive, seeded_rng, Seed};
use crate::village::catalog::{compose_building_list, select_anchor};
use crate::village::events::{EventSink, VillageEvent, VillageEventKind};
use crate::village::interior::{attach_interiors, InteriorPlanner};
use crate::village::options::VillageOptions;
use crate::village::placement::{place_anchor, place_buildings, settlement_bounds};
use crate::village::roads::build_roads;
use crate::village::rural::extend_rural;
use crate::village::walls::fit_walls;
use crate::village::{GenerationStats, RoadClass, VillageLayout};

/// Generates a village for `seed` with the given options.
///
/// Identical `(seed, options)` pairs always produce identical layouts.
pub fn generate(seed: impl Into<Seed>, options: &VillageOptions) -> Result<VillageLayout> {
    VillageGenerator::try_new(options.clone())?.generate(seed)
}

/// Reusable generator holding validated options and an optional interior planner.
pub struct VillageGenerator<'a> {
    /// Options applied to every run.
    pub options: VillageOptions,
    planner: Option<Box<dyn InteriorPlanner + 'a>>,
}

impl<'a> VillageGenerator<'a> {
    pub fn try_new(options: VillageOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            planner: None,
        })
    }

    pub fn new(options: VillageOptions) -> Self {
        debug_assert!(options.validate().is_ok(), "invalid village options");
        Self {
            options,
            planner: None,
        }
    }

    /// Sets the planner consulted when `procedural_buildings` is on.
    pub fn with_interior_planner(mut self, planner: impl InteriorPlanner + 'a) -> Self {
        self.planner = Some(Box::new(planner));
        self
    }

    pub fn generate(&mut self, seed: impl Into<Seed>) -> Result<VillageLayout> {
        self.generate_with_events(seed, &mut ())
    }

    pub fn generate_with_events(
        &mut self,
        seed: impl Into<Seed>,
        sink: &mut dyn EventSink,
    ) -> Result<VillageLayout> {
        self.options.validate()?;
        if self.options.procedural_buildings && self.planner.is_none() {
            return Err(Error::InvalidOptions(
                "procedural_buildings requires an interior planner".into(),
            ));
        }

        let seed = seed.into().value();
        let mut rng = seeded_rng(seed);
        let planner = if self.options.procedural_buildings {
            self.planner.as_deref_mut()
        } else {
            None
        };
        Ok(run_village(&self.options, seed, &mut rng, planner, sink))
    }
}

/// Runs the full pipeline on `rng`.
///
/// Stage order is fixed: building target, bounds, anchor and building list, roads,
/// anchor placement, remaining placement, wall, rural extension, interiors.
pub fn run_village<'p, R: Rng + ?Sized>(
    options: &VillageOptions,
    seed: u64,
    rng: &mut R,
    planner: Option<&mut (dyn InteriorPlanner + 'p)>,
    sink: &mut dyn EventSink,
) -> VillageLayout {
    let (size, setting) = (options.size, options.setting);
    let center = Vec2::ZERO;

    let range = size.building_range();
    let target = options
        .building_count
        .unwrap_or_else(|| int_inclusive(rng, *range.start(), *range.end()));
    info!(
        "Village {} | {} {} | {} building(s) requested.",
        seed, size, setting, target
    );
    if sink.wants(VillageEventKind::RunStarted) {
        sink.send(VillageEvent::RunStarted {
            seed,
            requested_buildings: target,
        });
    }

    let bounds = settlement_bounds(center, size.radius(), rng);
    let anchor = select_anchor(setting, rng);
    let queue = compose_building_list(size, setting, anchor, target, rng);
    debug!("Anchor {}; {} more queued.", anchor, queue.len());

    let mut roads = build_roads(center, size, options.main_road_count(), rng);
    let count = |class: RoadClass| roads.iter().filter(|r| r.class == class).count();
    let (main, side, path) = (
        count(RoadClass::Main),
        count(RoadClass::Side),
        count(RoadClass::Path),
    );
    info!("Roads: {} main, {} side, {} path.", main, side, path);
    if sink.wants(VillageEventKind::RoadsBuilt) {
        sink.send(VillageEvent::RoadsBuilt { main, side, path });
    }

    let mut buildings: Vec<_> = place_anchor(anchor, &roads, &bounds, rng, sink)
        .into_iter()
        .collect();
    let rest = place_buildings(&queue, &roads, &bounds, &buildings, rng, sink);
    buildings.extend(rest);
    let placed = buildings.len();
    info!("Placed {} of {} building(s).", placed, target);

    let wall = fit_walls(&buildings, &roads, size, options.include_walls, rng, sink);
    let rural = extend_rural(&roads, &wall.walls, rng, sink);

    let stats = GenerationStats {
        requested_buildings: target,
        placed_buildings: placed,
        dropped_buildings: target.saturating_sub(placed),
        gate_fallback: wall.gate_fallback,
        rural_buildings: rural.buildings.len(),
    };
    roads.extend(rural.roads);
    buildings.extend(rural.buildings);

    if let Some(planner) = planner {
        let attached = attach_interiors(&mut buildings, seed, planner);
        info!("Interiors attached to {} building(s).", attached);
    }

    if sink.wants(VillageEventKind::RunFinished) {
        sink.send(VillageEvent::RunFinished {
            stats: stats.clone(),
        });
    }

    VillageLayout {
        seed,
        size,
        setting,
        center,
        bounds,
        roads,
        buildings,
        walls: wall.walls,
        stats,
    }
}
