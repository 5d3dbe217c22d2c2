//! Organism and food state.

use crate::render::ShapeHandle;
use rand::Rng;
use serde::{Deserialize, Serialize};
use terrarium_core::{
    DeathCause, FoodId, LineageColor, LineageId, OrganismId, TraitRanges, Vec3,
};

/// Heritable attributes, sampled once for founders and copied verbatim to
/// offspring. A plain value type so inheritance is a struct copy with no
/// shared mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub base_energy: i32,
    pub speed: f64,
    pub sight_radius: f64,
    pub idle_cost: i32,
    pub run_cost: i32,
    pub wander_cost: i32,
    pub random_move_chance: f64,
    pub attack_chance: f64,
    pub attack_radius: f64,
    pub attack_damage: i32,
    pub color: LineageColor,
}

impl Traits {
    /// Sample founder traits; the two chances are uniform in `[0, 1)`.
    pub fn sample<R: Rng>(ranges: &TraitRanges, rng: &mut R) -> Self {
        Self {
            base_energy: rng.gen_range(ranges.base_energy.0..=ranges.base_energy.1),
            speed: rng.gen_range(ranges.speed.0..=ranges.speed.1),
            sight_radius: rng.gen_range(ranges.sight_radius.0..=ranges.sight_radius.1),
            idle_cost: rng.gen_range(ranges.idle_cost.0..=ranges.idle_cost.1),
            run_cost: rng.gen_range(ranges.run_cost.0..=ranges.run_cost.1),
            wander_cost: rng.gen_range(ranges.wander_cost.0..=ranges.wander_cost.1),
            random_move_chance: rng.gen(),
            attack_chance: rng.gen(),
            attack_radius: rng.gen_range(ranges.attack_radius.0..=ranges.attack_radius.1),
            attack_damage: rng.gen_range(ranges.attack_damage.0..=ranges.attack_damage.1),
            color: LineageColor::sample(rng),
        }
    }
}

/// An organism in the simulation
#[derive(Debug, Clone)]
pub struct Organism {
    pub id: OrganismId,
    pub lineage: LineageId,
    pub position: Vec3,
    pub energy: i32,
    pub traits: Traits,
    pub shape: Option<ShapeHandle>,
    /// Set when the death has already been accounted for (combat); the
    /// end-of-tick sweep fills in starvation for the rest.
    pub cause_of_death: Option<DeathCause>,
}

impl Organism {
    pub fn founder(lineage: LineageId, position: Vec3, traits: Traits) -> Self {
        Self {
            id: OrganismId::new(),
            lineage,
            position,
            energy: traits.base_energy,
            traits,
            shape: None,
            cause_of_death: None,
        }
    }

    /// Child at `position` inheriting the parent's trait snapshot verbatim.
    pub fn offspring(parent: &Organism, position: Vec3) -> Self {
        Self {
            id: OrganismId::new(),
            lineage: parent.lineage,
            position,
            energy: parent.traits.base_energy,
            traits: parent.traits,
            shape: None,
            cause_of_death: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.energy <= 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    pub fn gain(&mut self, amount: i32) {
        self.energy += amount;
    }

    /// Deduct energy, flooring at zero so a dead organism never goes
    /// negative.
    pub fn spend(&mut self, amount: i32) {
        self.energy = (self.energy - amount).max(0);
    }

    /// Reproduction gate: energy strictly above twice the base allotment.
    pub fn can_reproduce(&self) -> bool {
        self.energy > 2 * self.traits.base_energy
    }
}

/// A food item waiting to be eaten
#[derive(Debug, Clone)]
pub struct Food {
    pub id: FoodId,
    pub position: Vec3,
    pub value: i32,
    pub shape: Option<ShapeHandle>,
}

impl Food {
    pub fn new(position: Vec3, value: i32) -> Self {
        Self {
            id: FoodId::new(),
            position,
            value,
            shape: None,
        }
    }
}
