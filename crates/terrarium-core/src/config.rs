//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Vec3;
use serde::{Deserialize, Serialize};

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width of the world volume
    pub width: f64,
    /// Height of the world volume
    pub height: f64,
    /// Depth of the world volume; 0 collapses the world to a plane
    pub depth: f64,
    /// Edge length of one spatial-grid cell
    pub cell_size: f64,
    /// Number of founder organisms spawned at init
    pub initial_population: usize,
    /// Minimum food items spawned per tick
    pub food_batch_min: u32,
    /// Maximum food items spawned per tick
    pub food_batch_max: u32,
    /// Minimum nutritional value of one food item
    pub food_value_min: i32,
    /// Maximum nutritional value of one food item
    pub food_value_max: i32,
}

impl WorldConfig {
    /// Upper corner of the world volume; positions clamp into `[0, extent]`.
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Whether a position lies inside the volume.
    pub fn contains(&self, pos: Vec3) -> bool {
        (0.0..=self.width).contains(&pos.x)
            && (0.0..=self.height).contains(&pos.y)
            && (0.0..=self.depth.max(0.0)).contains(&pos.z)
    }

    pub fn is_planar(&self) -> bool {
        self.depth <= 0.0
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 60.0,
            depth: 60.0,
            cell_size: 10.0,
            initial_population: 20,
            food_batch_min: 5,
            food_batch_max: 20,
            food_value_min: 50,
            food_value_max: 100,
        }
    }
}

/// Sampling ranges for founder traits; offspring copy the parent snapshot
/// verbatim and never resample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitRanges {
    /// Base energy allotment (also the reproduction threshold reference)
    pub base_energy: (i32, i32),
    /// Distance covered by one move
    pub speed: (f64, f64),
    /// Detection radius for food and hostiles
    pub sight_radius: (f64, f64),
    /// Energy spent on a tick with no action
    pub idle_cost: (i32, i32),
    /// Per-unit-speed cost of running at food
    pub run_cost: (i32, i32),
    /// Per-unit-speed cost of a wandering step
    pub wander_cost: (i32, i32),
    /// Reach of an attack
    pub attack_radius: (f64, f64),
    /// Energy removed from the victim per hit
    pub attack_damage: (i32, i32),
}

impl Default for TraitRanges {
    fn default() -> Self {
        Self {
            base_energy: (100, 200),
            speed: (2.0, 7.0),
            sight_radius: (10.0, 70.0),
            idle_cost: (1, 2),
            run_cost: (1, 10),
            wander_cost: (2, 4),
            attack_radius: (1.0, 5.0),
            attack_damage: (1, 30),
        }
    }
}

/// World rules that gate optional behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Allow organisms to attack hostile lineages
    pub allow_combat: bool,
    /// Allow organisms to reproduce
    pub allow_reproduction: bool,
    /// Hard cap on the organism count
    pub max_population: usize,
    /// Fixed energy debit taken from a parent on reproduction
    pub reproduce_cost: i32,
    /// Per-axis jitter applied to a child's spawn position
    pub reproduce_offset: f64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            allow_combat: true,
            allow_reproduction: true,
            max_population: 1000,
            reproduce_cost: 50,
            reproduce_offset: 5.0,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of ticks to run
    pub num_ticks: u64,
    /// Random seed for the world RNG
    pub seed: u64,
    /// Fixed delay between ticks (not wall-clock corrected)
    pub tick_interval_ms: u64,
    /// World configuration
    pub world: WorldConfig,
    /// Trait sampling ranges
    pub traits: TraitRanges,
    /// Rule set
    pub rules: RuleSet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_ticks: 10_000,
            seed: 0,
            tick_interval_ms: 16,
            world: WorldConfig::default(),
            traits: TraitRanges::default(),
            rules: RuleSet::default(),
        }
    }
}

impl SimConfig {
    /// The planar variant: a 400x400 plane, small founder population,
    /// slow ticks, no combat.
    pub fn flatland() -> Self {
        Self {
            num_ticks: 10_000,
            seed: 0,
            tick_interval_ms: 500,
            world: WorldConfig {
                width: 400.0,
                height: 400.0,
                depth: 0.0,
                cell_size: 10.0,
                initial_population: 5,
                food_batch_min: 1,
                food_batch_max: 3,
                food_value_min: 5,
                food_value_max: 20,
            },
            traits: TraitRanges {
                base_energy: (50, 50),
                speed: (5.0, 5.0),
                sight_radius: (600.0, 600.0),
                idle_cost: (5, 5),
                run_cost: (1, 1),
                wander_cost: (1, 1),
                ..TraitRanges::default()
            },
            rules: RuleSet {
                allow_combat: false,
                reproduce_cost: 30,
                ..RuleSet::default()
            },
        }
    }

    /// Reject configurations the engine cannot index safely.
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        if w.width <= 0.0 || w.height <= 0.0 || w.depth < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "world extent must be positive (depth may be 0): {}x{}x{}",
                w.width, w.height, w.depth
            )));
        }
        if w.cell_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cell_size must be positive: {}",
                w.cell_size
            )));
        }
        if w.initial_population == 0 {
            return Err(Error::InvalidConfig(
                "initial_population must be at least 1".to_string(),
            ));
        }
        if w.food_batch_min > w.food_batch_max || w.food_value_min > w.food_value_max {
            return Err(Error::InvalidConfig(
                "food ranges must satisfy min <= max".to_string(),
            ));
        }
        if self.traits.speed.0 <= 0.0 || self.traits.sight_radius.0 < 0.0 {
            return Err(Error::InvalidConfig(
                "speed must be positive and sight_radius non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
