//! The decision engine: an ordered cascade of named rules.
//!
//! Each rule looks at the snapshot and either claims the turn with an
//! [`Action`] or passes. Rules are evaluated top-down and the first claim
//! wins; when nobody claims the turn the agent rests. The order of
//! [`CASCADE`] is part of the behavior:
//!
//! 1. `death_zone` -- leave a death zone through a safe neighbour
//! 2. `healing` -- drink the strongest recovery item when hurt
//! 3. `combat` -- attack the first favourable target, or flee a bad crowd
//! 4. `looting` -- pick up the most valuable ground item if there is room
//! 5. `equipment` -- equip the best weapon when unarmed
//! 6. `movement` -- rest on low ep, sometimes explore, else move to the best region
//!
//! The engine never fails. Missing optional data (no weapon, no adjacency)
//! simply makes the corresponding rule pass.

use molty_types::{Action, StateSnapshot};
use tracing::debug;

use crate::combat::{should_attack, should_flee};
use crate::death_zone::find_safe_direction;
use crate::items::{
    best_ground_item, best_healing_item, best_weapon, first_max_by_key, has_room, need_healing,
};
use crate::random::RandomSource;
use crate::terrain::region_score;

/// Probability of exploring the current region instead of moving.
pub const EXPLORE_PROBABILITY: f64 = 0.3;

/// Minimum ep for the movement rule to act at all.
const MIN_ACTION_EP: u32 = 1;

/// Below this ep the movement rule rests to recover.
const REST_BELOW_EP: u32 = 3;

/// Name reported when no rule claimed the turn.
pub const FALLBACK_RULE: &str = "fallback";

/// Signature shared by every cascade rule.
pub type RuleFn = fn(&StateSnapshot, &mut dyn RandomSource) -> Option<Action>;

/// A named entry in the cascade.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable name used in logs.
    pub name: &'static str,
    /// The predicate and action builder.
    pub apply: RuleFn,
}

/// The priority cascade, highest priority first.
pub const CASCADE: &[Rule] = &[
    Rule {
        name: "death_zone",
        apply: escape_death_zone,
    },
    Rule {
        name: "healing",
        apply: heal,
    },
    Rule {
        name: "combat",
        apply: fight_or_flee,
    },
    Rule {
        name: "looting",
        apply: loot,
    },
    Rule {
        name: "equipment",
        apply: equip,
    },
    Rule {
        name: "movement",
        apply: roam,
    },
];

/// An action together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The action to submit.
    pub action: Action,
    /// Name of the rule that claimed the turn.
    pub rule: &'static str,
}

/// Run the cascade and report which rule fired.
pub fn evaluate(snapshot: &StateSnapshot, rng: &mut dyn RandomSource) -> Decision {
    for rule in CASCADE {
        if let Some(action) = (rule.apply)(snapshot, rng) {
            debug!(rule = rule.name, action = %action, "rule claimed turn");
            return Decision {
                action,
                rule: rule.name,
            };
        }
    }
    Decision {
        action: Action::Rest,
        rule: FALLBACK_RULE,
    }
}

/// Choose exactly one action for this turn.
pub fn decide(snapshot: &StateSnapshot, rng: &mut dyn RandomSource) -> Action {
    evaluate(snapshot, rng).action
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn escape_death_zone(snapshot: &StateSnapshot, _rng: &mut dyn RandomSource) -> Option<Action> {
    find_safe_direction(&snapshot.location)
        .cloned()
        .map(Action::Move)
}

fn heal(snapshot: &StateSnapshot, _rng: &mut dyn RandomSource) -> Option<Action> {
    if !need_healing(&snapshot.vitals) {
        return None;
    }
    best_healing_item(&snapshot.inventory).map(|item| Action::UseItem(item.id.clone()))
}

fn fight_or_flee(snapshot: &StateSnapshot, rng: &mut dyn RandomSource) -> Option<Action> {
    if let Some(target) = snapshot
        .units
        .iter()
        .find(|unit| should_attack(&snapshot.vitals, unit).engage)
    {
        return Some(Action::Attack(target.id.clone()));
    }

    if !should_flee(&snapshot.vitals, &snapshot.units) {
        return None;
    }

    let exits: Vec<_> = snapshot.viable_adjacent().collect();
    rng.pick(exits.len())
        .and_then(|index| exits.get(index))
        .map(|region| Action::Move(region.direction.clone()))
}

fn loot(snapshot: &StateSnapshot, _rng: &mut dyn RandomSource) -> Option<Action> {
    if !has_room(&snapshot.inventory) {
        return None;
    }
    best_ground_item(&snapshot.ground_items).map(|item| Action::Pickup(item.id.clone()))
}

fn equip(snapshot: &StateSnapshot, _rng: &mut dyn RandomSource) -> Option<Action> {
    if snapshot.equipped_weapon.is_some() {
        return None;
    }
    best_weapon(&snapshot.inventory).map(|item| Action::Equip(item.id.clone()))
}

fn roam(snapshot: &StateSnapshot, rng: &mut dyn RandomSource) -> Option<Action> {
    let ep = snapshot.vitals.ep;
    if ep < MIN_ACTION_EP {
        return None;
    }
    if ep < REST_BELOW_EP {
        return Some(Action::Rest);
    }
    if rng.chance(EXPLORE_PROBABILITY) {
        return Some(Action::Explore);
    }
    first_max_by_key(snapshot.viable_adjacent(), |region| region_score(region))
        .map(|region| Action::Move(region.direction.clone()))
}
