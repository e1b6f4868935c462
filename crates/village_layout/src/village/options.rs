//! Caller-facing generation options.
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Upper limit for an explicit building count.
pub const MAX_BUILDING_COUNT: usize = 120;

/// Settlement size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Size {
    Tiny,
    Small,
    Medium,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Tiny, Size::Small, Size::Medium];

    /// Nominal settlement radius in units.
    pub fn radius(self) -> f32 {
        match self {
            Size::Tiny => 60.0,
            Size::Small => 80.0,
            Size::Medium => 100.0,
        }
    }

    /// Village building count drawn per run, inclusive.
    pub fn building_range(self) -> RangeInclusive<usize> {
        match self {
            Size::Tiny => 12..=18,
            Size::Small => 20..=30,
            Size::Medium => 35..=45,
        }
    }

    /// Chance that a wall is built when the caller does not decide.
    pub fn wall_probability(self) -> f32 {
        match self {
            Size::Tiny => 0.1,
            Size::Small => 0.3,
            Size::Medium => 0.6,
        }
    }

    pub fn gate_cap(self) -> usize {
        match self {
            Size::Tiny => 1,
            Size::Small => 2,
            Size::Medium => 3,
        }
    }

    fn base_main_roads(self) -> usize {
        match self {
            Size::Tiny => 2,
            Size::Small | Size::Medium => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Size::Tiny => "tiny",
            Size::Small => "small",
            Size::Medium => "medium",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(Size::Tiny),
            "small" => Ok(Size::Small),
            "medium" => Ok(Size::Medium),
            other => Err(Error::InvalidOptions(format!("unknown size '{other}'"))),
        }
    }
}

/// Economic setting; biases the optional building pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Setting {
    Farming,
    Coastal,
    Forest,
    Crossroads,
}

impl Setting {
    pub const ALL: [Setting; 4] = [
        Setting::Farming,
        Setting::Coastal,
        Setting::Forest,
        Setting::Crossroads,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Setting::Farming => "farming",
            Setting::Coastal => "coastal",
            Setting::Forest => "forest",
            Setting::Crossroads => "crossroads",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farming" => Ok(Setting::Farming),
            "coastal" => Ok(Setting::Coastal),
            "forest" => Ok(Setting::Forest),
            "crossroads" => Ok(Setting::Crossroads),
            other => Err(Error::InvalidOptions(format!("unknown setting '{other}'"))),
        }
    }
}

/// Options for one generation run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VillageOptions {
    pub size: Size,
    pub setting: Setting,
    /// Force a wall on or off; `None` rolls against [`Size::wall_probability`].
    pub include_walls: Option<bool>,
    /// Ask the configured interior planner for a plan per building.
    pub procedural_buildings: bool,
    /// Override the drawn building count.
    pub building_count: Option<usize>,
}

impl Default for VillageOptions {
    fn default() -> Self {
        Self {
            size: Size::Small,
            setting: Setting::Farming,
            include_walls: None,
            procedural_buildings: false,
            building_count: None,
        }
    }
}

impl VillageOptions {
    pub fn new(size: Size, setting: Setting) -> Self {
        Self {
            size,
            setting,
            ..Default::default()
        }
    }

    pub fn with_walls(mut self, include: bool) -> Self {
        self.include_walls = Some(include);
        self
    }

    pub fn with_procedural_buildings(mut self, enabled: bool) -> Self {
        self.procedural_buildings = enabled;
        self
    }

    pub fn with_building_count(mut self, count: usize) -> Self {
        self.building_count = Some(count);
        self
    }

    /// Main roads radiating from the center: 2 for tiny, 3 otherwise, one more at a
    /// crossroads, never more than 4.
    pub fn main_road_count(&self) -> usize {
        let extra = usize::from(self.setting == Setting::Crossroads);
        (self.size.base_main_roads() + extra).min(4)
    }

    /// Rejects option combinations no run could honor.
    pub fn validate(&self) -> Result<()> {
        match self.building_count {
            Some(0) => Err(Error::InvalidOptions(
                "building_count must be > 0".into(),
            )),
            Some(n) if n > MAX_BUILDING_COUNT => Err(Error::InvalidOptions(format!(
                "building_count must be <= {MAX_BUILDING_COUNT}, got {n}"
            ))),
            _ => Ok(()),
        }
    }
}
