//! The per-turn state snapshot read by the decision engine.
//!
//! A [`StateSnapshot`] is built fresh from every successful state poll and
//! dropped after one decision. It is plain data: the server enforces
//! `hp <= max_hp` and `ep <= max_ep`, and nothing here re-validates them.
//! Inventory size limits are a policy concern, not a model concern.

use serde::{Deserialize, Serialize};

use crate::enums::{GameStatus, ItemCategory, Terrain, UnitKind};
use crate::ids::{AgentId, Direction, ItemId, RegionId, UnitId};

/// Immutable view of one polled game and agent state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Who the agent is and whether it is still alive.
    pub agent: AgentIdentity,
    /// Combat and resource stats.
    pub vitals: Vitals,
    /// Current region and its one-hop neighbourhood.
    pub location: Location,
    /// Carried items, in server order.
    pub inventory: Vec<Item>,
    /// Currently equipped weapon, if any.
    pub equipped_weapon: Option<Item>,
    /// Other units present in the current region.
    pub units: Vec<Unit>,
    /// Items lying on the ground in the current region.
    pub ground_items: Vec<GroundItem>,
    /// Kills scored so far in this game.
    pub kills: u32,
    /// Lifecycle status of the game.
    pub status: GameStatus,
    /// Server turn counter, when reported.
    pub turn: Option<u64>,
}

impl StateSnapshot {
    /// Iterate over the adjacent regions that can be entered.
    pub fn viable_adjacent(&self) -> impl Iterator<Item = &AdjacentRegion> {
        self.location.adjacent.iter().flatten()
    }
}

/// Identity of the controlled agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Agent id inside the current game.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// False once the server reports the agent dead.
    pub is_alive: bool,
}

/// Agent stats at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vitals {
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current energy points.
    pub ep: u32,
    /// Maximum energy points.
    pub max_ep: u32,
    /// Attack stat.
    pub attack: u32,
    /// Defense stat.
    pub defense: u32,
    /// Vision radius.
    pub vision: u32,
}

/// The agent's region and its adjacency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Region the agent stands in.
    pub region_id: RegionId,
    /// Whether the current region is an active death zone.
    pub is_death_zone: bool,
    /// Terrain of the current region, when reported.
    pub terrain: Option<Terrain>,
    /// Adjacent region slots; `None` marks an impassable direction.
    pub adjacent: Vec<Option<AdjacentRegion>>,
}

/// An enterable neighbour of the current region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentRegion {
    /// Label to send in a `move` action.
    pub direction: Direction,
    /// Terrain of the neighbouring region.
    pub terrain: Terrain,
    /// Whether the agent has already explored it.
    pub explored: bool,
    /// Whether the neighbouring region is itself a death zone.
    pub is_death_zone: bool,
    /// Region id behind the direction, when reported.
    pub region_id: Option<RegionId>,
}

/// An item in the agent's inventory or weapon slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Instance id used as an action target.
    pub id: ItemId,
    /// Catalogue type id, when reported.
    pub type_id: Option<String>,
    /// Category tag.
    pub category: ItemCategory,
    /// Display name.
    pub name: Option<String>,
    /// Stack size.
    pub quantity: u32,
    /// Attack bonus granted when equipped (weapons).
    pub attack_bonus: u32,
    /// Hit points restored on use (recovery items).
    pub hp_restore: u32,
}

/// Another unit present in the agent's region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit id used as an attack target.
    pub id: UnitId,
    /// Agent or monster.
    pub kind: UnitKind,
    /// Display name.
    pub name: Option<String>,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Attack stat.
    pub attack: u32,
    /// Defense stat.
    pub defense: u32,
}

/// An item lying on the ground in the agent's region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItem {
    /// Item id used as a pickup target.
    pub id: ItemId,
    /// Display name.
    pub name: Option<String>,
    /// Server-assigned value used to rank pickups.
    pub value: u32,
}
