//! Snapshot builders shared by the policy unit tests.

use molty_types::{
    AdjacentRegion, AgentId, AgentIdentity, Direction, GameStatus, GroundItem, Item, ItemCategory,
    ItemId, Location, RegionId, StateSnapshot, Terrain, Unit, UnitId, UnitKind, Vitals,
};

/// A healthy, rested agent in a quiet region with no neighbours.
pub fn snapshot() -> StateSnapshot {
    StateSnapshot {
        agent: AgentIdentity {
            id: AgentId::new("agent-1"),
            name: "ProBot_AI".to_owned(),
            is_alive: true,
        },
        vitals: Vitals {
            hp: 100,
            max_hp: 100,
            ep: 10,
            max_ep: 10,
            attack: 20,
            defense: 10,
            vision: 2,
        },
        location: Location {
            region_id: RegionId::new("r-0"),
            is_death_zone: false,
            terrain: Some(Terrain::Plains),
            adjacent: Vec::new(),
        },
        inventory: Vec::new(),
        equipped_weapon: None,
        units: Vec::new(),
        ground_items: Vec::new(),
        kills: 0,
        status: GameStatus::Running,
        turn: Some(1),
    }
}

pub fn adjacent(direction: &str, terrain: Terrain, explored: bool) -> AdjacentRegion {
    AdjacentRegion {
        direction: Direction::new(direction),
        terrain,
        explored,
        is_death_zone: false,
        region_id: None,
    }
}

pub fn death_zone(direction: &str) -> AdjacentRegion {
    AdjacentRegion {
        is_death_zone: true,
        ..adjacent(direction, Terrain::Plains, true)
    }
}

pub fn monster(id: &str, hp: u32, attack: u32, defense: u32) -> Unit {
    Unit {
        id: UnitId::new(id),
        kind: UnitKind::Monster,
        name: None,
        hp,
        max_hp: hp,
        attack,
        defense,
    }
}

pub fn potion(id: &str, hp_restore: u32) -> Item {
    Item {
        id: ItemId::new(id),
        type_id: None,
        category: ItemCategory::Recovery,
        name: Some("potion".to_owned()),
        quantity: 1,
        attack_bonus: 0,
        hp_restore,
    }
}

pub fn weapon(id: &str, attack_bonus: u32) -> Item {
    Item {
        id: ItemId::new(id),
        type_id: None,
        category: ItemCategory::Weapon,
        name: Some("blade".to_owned()),
        quantity: 1,
        attack_bonus,
        hp_restore: 0,
    }
}

pub fn ground(id: &str, value: u32) -> GroundItem {
    GroundItem {
        id: ItemId::new(id),
        name: None,
        value,
    }
}
