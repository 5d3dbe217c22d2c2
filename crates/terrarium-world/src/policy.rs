//! Per-tick action selection for an organism.

use crate::organism::{Food, Organism};
use rand::Rng;
use terrarium_core::{FoodId, OrganismId, RuleSet};

/// The single action an organism takes in a tick. Branches are mutually
/// exclusive; the first matching one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run at the nearest food in sight
    Seek { food: FoodId },
    /// Strike the nearest hostile in sight
    Attack { target: OrganismId },
    /// One random-heading step
    Wander,
    /// Stay put
    Idle,
}

/// Decide what `actor` does this tick.
///
/// Order: food in sight beats everything; otherwise a hostile in sight is
/// attacked when the attack draw passes; otherwise the wander draw; idle as
/// the fallback.
pub fn decide<R: Rng>(
    actor: &Organism,
    foods: &[Food],
    organisms: &[Organism],
    rules: &RuleSet,
    rng: &mut R,
) -> Action {
    if let Some(food) = nearest_food(actor, foods) {
        return Action::Seek { food };
    }

    if rules.allow_combat {
        if let Some(target) = nearest_hostile(actor, organisms) {
            if rng.gen::<f64>() < actor.traits.attack_chance {
                return Action::Attack { target };
            }
        }
    }

    if rng.gen::<f64>() < actor.traits.random_move_chance {
        return Action::Wander;
    }

    Action::Idle
}

/// Strictly nearest food within sight radius. Scanning is in insertion
/// order with a strict comparison, so the first-inserted of two equidistant
/// items wins.
fn nearest_food(actor: &Organism, foods: &[Food]) -> Option<FoodId> {
    let mut nearest: Option<(FoodId, f64)> = None;
    for food in foods {
        let dist = actor.position.distance(food.position);
        if dist > actor.traits.sight_radius {
            continue;
        }
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((food.id, dist));
        }
    }
    nearest.map(|(id, _)| id)
}

/// Strictly nearest living organism of a different lineage within sight
/// radius; same tie-break rule as food.
fn nearest_hostile(actor: &Organism, organisms: &[Organism]) -> Option<OrganismId> {
    let mut nearest: Option<(OrganismId, f64)> = None;
    for other in organisms {
        if other.id == actor.id || other.lineage == actor.lineage || other.is_dead() {
            continue;
        }
        let dist = actor.position.distance(other.position);
        if dist > actor.traits.sight_radius {
            continue;
        }
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((other.id, dist));
        }
    }
    nearest.map(|(id, _)| id)
}
