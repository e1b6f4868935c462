//! Building catalog: one fixed record per building type plus pure selection helpers.
//!
//! Records carry everything placement needs (weight, base footprint, road preference,
//! setback and spacing); nothing here draws from the stream except the selection
//! functions, which take the run RNG explicitly.
use std::fmt;

use glam::Vec2;
use rand::Rng;

use crate::random::{choose, int_inclusive, rand01, shuffle};
use crate::village::interior::SocialClass;
use crate::village::options::{Setting, Size};
use crate::village::RoadClass;

/// Every building the generator knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BuildingType {
    House,
    Inn,
    Blacksmith,
    Farm,
    Mill,
    Woodworker,
    Fisher,
    Market,
    Chapel,
    Stable,
    Well,
    Granary,
    Shrine,
    Alchemist,
    Herbalist,
    WizardTower,
}

/// Which road a building type likes to front onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoadPreference {
    Any,
    /// Pick a road of `class` with `probability`, otherwise any road.
    Prefer { class: RoadClass, probability: f32 },
}

/// Fixed placement record for a building type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingTemplate {
    pub building_type: BuildingType,
    /// Relative weight for weighted picks from a pool.
    pub weight: f32,
    /// Base footprint: x along the road, y away from it.
    pub size: Vec2,
    pub road: RoadPreference,
    /// Extra distance kept between the road edge and the footprint.
    pub setback: f32,
    /// Minimum center-to-center distance to other buildings.
    pub min_spacing: f32,
    pub social_class: SocialClass,
}

const MAIN_70: RoadPreference = RoadPreference::Prefer {
    class: RoadClass::Main,
    probability: 0.7,
};

const fn record(
    building_type: BuildingType,
    weight: f32,
    size: (f32, f32),
    road: RoadPreference,
    setback: f32,
    min_spacing: f32,
    social_class: SocialClass,
) -> BuildingTemplate {
    BuildingTemplate {
        building_type,
        weight,
        size: Vec2::new(size.0, size.1),
        road,
        setback,
        min_spacing,
        social_class,
    }
}

impl BuildingType {
    pub const ALL: [BuildingType; 16] = [
        BuildingType::House,
        BuildingType::Inn,
        BuildingType::Blacksmith,
        BuildingType::Farm,
        BuildingType::Mill,
        BuildingType::Woodworker,
        BuildingType::Fisher,
        BuildingType::Market,
        BuildingType::Chapel,
        BuildingType::Stable,
        BuildingType::Well,
        BuildingType::Granary,
        BuildingType::Shrine,
        BuildingType::Alchemist,
        BuildingType::Herbalist,
        BuildingType::WizardTower,
    ];

    pub const fn template(self) -> BuildingTemplate {
        use BuildingType::*;
        use RoadPreference::Any;
        use SocialClass::{Common, Poor, Wealthy};
        match self {
            House => record(House, 1.0, (8.0, 6.0), Any, 1.0, 12.0, Common),
            Inn => record(Inn, 1.0, (12.0, 10.0), MAIN_70, 2.0, 14.0, Wealthy),
            Blacksmith => record(Blacksmith, 1.0, (10.0, 8.0), MAIN_70, 2.0, 13.0, Common),
            Farm => record(
                Farm,
                3.0,
                (15.0, 12.0),
                RoadPreference::Prefer {
                    class: RoadClass::Path,
                    probability: 0.6,
                },
                5.0,
                25.0,
                Poor,
            ),
            Mill => record(Mill, 2.0, (8.0, 8.0), Any, 2.0, 12.0, Common),
            Woodworker => record(Woodworker, 3.0, (10.0, 8.0), Any, 2.0, 12.0, Common),
            Fisher => record(Fisher, 3.0, (8.0, 6.0), Any, 1.0, 12.0, Poor),
            Market => record(Market, 2.0, (12.0, 8.0), MAIN_70, 2.0, 14.0, Wealthy),
            Chapel => record(Chapel, 1.0, (10.0, 14.0), Any, 3.0, 14.0, Common),
            Stable => record(Stable, 2.0, (12.0, 8.0), Any, 2.0, 12.0, Common),
            Well => record(Well, 1.0, (3.0, 3.0), Any, 1.0, 6.0, Common),
            Granary => record(Granary, 2.0, (8.0, 8.0), Any, 2.0, 12.0, Common),
            Shrine => record(Shrine, 3.0, (5.0, 5.0), Any, 2.0, 9.0, Common),
            Alchemist => record(Alchemist, 2.0, (8.0, 7.0), Any, 1.0, 12.0, Wealthy),
            Herbalist => record(Herbalist, 2.0, (7.0, 6.0), Any, 1.0, 11.0, Poor),
            WizardTower => record(WizardTower, 1.0, (7.0, 7.0), Any, 3.0, 14.0, Wealthy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildingType::House => "house",
            BuildingType::Inn => "inn",
            BuildingType::Blacksmith => "blacksmith",
            BuildingType::Farm => "farm",
            BuildingType::Mill => "mill",
            BuildingType::Woodworker => "woodworker",
            BuildingType::Fisher => "fisher",
            BuildingType::Market => "market",
            BuildingType::Chapel => "chapel",
            BuildingType::Stable => "stable",
            BuildingType::Well => "well",
            BuildingType::Granary => "granary",
            BuildingType::Shrine => "shrine",
            BuildingType::Alchemist => "alchemist",
            BuildingType::Herbalist => "herbalist",
            BuildingType::WizardTower => "wizard_tower",
        }
    }

    /// Whether an interior plan makes sense for this type.
    pub fn has_interior(self) -> bool {
        !matches!(self, BuildingType::Well)
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Vocations nearly every village has.
pub const CORE_VOCATIONS: [BuildingType; 2] = [BuildingType::Inn, BuildingType::Blacksmith];

/// Fantasy-flavor pool shared by all settings.
pub const FANTASY_POOL: [BuildingType; 4] = [
    BuildingType::Shrine,
    BuildingType::Alchemist,
    BuildingType::Herbalist,
    BuildingType::WizardTower,
];

/// Civic buildings rolled after the setting pool.
pub const CIVIC_POOL: [BuildingType; 2] = [BuildingType::Chapel, BuildingType::Well];

/// Types scattered along rural roads.
pub const RURAL_POOL: [BuildingType; 4] = [
    BuildingType::Farm,
    BuildingType::Mill,
    BuildingType::Woodworker,
    BuildingType::House,
];

/// Setting-specific optional vocations.
pub fn setting_pool(setting: Setting) -> &'static [BuildingType] {
    match setting {
        Setting::Farming => &[
            BuildingType::Farm,
            BuildingType::Mill,
            BuildingType::Granary,
            BuildingType::Stable,
        ],
        Setting::Coastal => &[
            BuildingType::Fisher,
            BuildingType::Market,
            BuildingType::Stable,
        ],
        Setting::Forest => &[
            BuildingType::Woodworker,
            BuildingType::Mill,
            BuildingType::Herbalist,
        ],
        Setting::Crossroads => &[BuildingType::Market, BuildingType::Stable, BuildingType::Inn],
    }
}

/// Candidates for the building that anchors the settlement center.
pub fn anchor_pool(setting: Setting) -> &'static [BuildingType] {
    match setting {
        Setting::Farming => &[BuildingType::Well, BuildingType::Granary],
        Setting::Coastal => &[BuildingType::Market, BuildingType::Fisher],
        Setting::Forest => &[BuildingType::Well, BuildingType::Woodworker],
        Setting::Crossroads => &[BuildingType::Market, BuildingType::Inn],
    }
}

/// Draws one type proportionally to its template weight.
pub fn pick_weighted<R: Rng + ?Sized>(
    pool: &[BuildingType],
    rng: &mut R,
) -> Option<BuildingType> {
    let total: f32 = pool.iter().map(|t| t.template().weight).sum();
    if pool.is_empty() || total <= 0.0 {
        return None;
    }

    let mut roll = rand01(rng) * total;
    for t in pool {
        roll -= t.template().weight;
        if roll < 0.0 {
            return Some(*t);
        }
    }

    pool.last().copied()
}

/// Chooses the anchor type for a setting.
pub fn select_anchor<R: Rng + ?Sized>(setting: Setting, rng: &mut R) -> BuildingType {
    pick_weighted(anchor_pool(setting), rng).unwrap_or(BuildingType::Well)
}

/// Orders the non-anchor building list for placement.
///
/// Groups are emitted in priority order (core vocations, setting-specific incl. civic,
/// fantasy flavor, filler houses) and shuffled within each group. Types already in
/// the list are not repeated, except houses. The result holds `target - 1` entries so
/// that, with the anchor, the run asks for exactly `target` buildings.
pub fn compose_building_list<R: Rng + ?Sized>(
    size: Size,
    setting: Setting,
    anchor: BuildingType,
    target: usize,
    rng: &mut R,
) -> Vec<BuildingType> {
    let mut taken = vec![anchor];
    let mut out = Vec::with_capacity(target);

    let mut core: Vec<BuildingType> = CORE_VOCATIONS
        .iter()
        .copied()
        .filter(|t| !taken.contains(t))
        .collect();
    shuffle(rng, &mut core);
    taken.extend(&core);
    out.extend(core);

    let pool = setting_pool(setting);
    let picks = int_inclusive(rng, 1, 3).min(pool.len());
    let mut setting_group = Vec::new();
    for _ in 0..picks {
        if let Some(t) = pick_weighted(pool, rng) {
            if !taken.contains(&t) {
                taken.push(t);
                setting_group.push(t);
            }
        }
    }
    let civic_chance = match size {
        Size::Tiny => 0.3,
        Size::Small => 0.6,
        Size::Medium => 1.0,
    };
    if rand01(rng) < civic_chance {
        if let Some(t) = choose(rng, &CIVIC_POOL).copied() {
            if !taken.contains(&t) {
                taken.push(t);
                setting_group.push(t);
            }
        }
    }
    shuffle(rng, &mut setting_group);
    out.extend(setting_group);

    let fantasy_picks = match size {
        Size::Tiny => int_inclusive(rng, 0, 1),
        Size::Small => 1,
        Size::Medium => int_inclusive(rng, 1, 2),
    };
    let mut fantasy = Vec::new();
    for _ in 0..fantasy_picks {
        if let Some(t) = pick_weighted(&FANTASY_POOL, rng) {
            if !taken.contains(&t) {
                taken.push(t);
                fantasy.push(t);
            }
        }
    }
    shuffle(rng, &mut fantasy);
    out.extend(fantasy);

    let remaining = target.saturating_sub(1);
    out.truncate(remaining);
    out.resize(remaining, BuildingType::House);
    out
}
