//! Enumeration types for the Molty Royale agent.
//!
//! Wire names follow the game API (lowercase tags, `useItem` in camel
//! case). Tags the agent does not know about deserialize into an `Other`
//! variant instead of failing, because the server adds content between
//! seasons without notice.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Terrain tag of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// High ground with the widest vision.
    Hills,
    /// Ruined structures with a high item find rate.
    Ruins,
    /// Open ground with good vision.
    Plains,
    /// Dense cover; stealthy but poor vision.
    Forest,
    /// Slow, exposed, best avoided.
    Water,
    /// Any terrain tag this build does not recognise.
    #[serde(other)]
    Other,
}

impl Terrain {
    /// Map a raw server tag onto a terrain, case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "hills" | "hill" => Self::Hills,
            "ruins" | "ruin" => Self::Ruins,
            "plains" | "plain" => Self::Plains,
            "forest" => Self::Forest,
            "water" => Self::Water,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Game status
// ---------------------------------------------------------------------------

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Lobby open, turns not yet running.
    Waiting,
    /// Turns are being processed.
    Running,
    /// The game is over.
    Finished,
}

impl GameStatus {
    /// Map a raw server status onto a [`GameStatus`].
    ///
    /// Unknown values are treated as [`GameStatus::Waiting`] so the loop
    /// keeps polling instead of acting against a game in an odd state.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "running" | "active" | "in_progress" => Self::Running,
            "finished" | "ended" | "completed" => Self::Finished,
            _ => Self::Waiting,
        }
    }

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }
}

impl core::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Items and units
// ---------------------------------------------------------------------------

/// Category tag of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Equippable weapon carrying an attack bonus.
    Weapon,
    /// Consumable that restores hp.
    Recovery,
    /// Anything else (armor, utility, quest items).
    #[serde(other)]
    Other,
}

impl ItemCategory {
    /// Map a raw server category onto an [`ItemCategory`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "weapon" => Self::Weapon,
            "recovery" => Self::Recovery,
            _ => Self::Other,
        }
    }
}

/// Kind of a unit sharing the map with the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Another player-controlled agent.
    Agent,
    /// A server-controlled monster.
    Monster,
    /// Unrecognised unit type.
    #[serde(other)]
    Other,
}

impl UnitKind {
    /// Map a raw server unit type onto a [`UnitKind`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "agent" | "player" => Self::Agent,
            "monster" | "mob" => Self::Monster,
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The kind of action submitted for a turn, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Move to an adjacent region.
    Move,
    /// Search the current region.
    Explore,
    /// Attack a co-located unit.
    Attack,
    /// Consume an inventory item.
    UseItem,
    /// Pick up an item lying in the current region.
    Pickup,
    /// Equip an inventory weapon.
    Equip,
    /// Recover energy.
    Rest,
}

impl ActionType {
    /// Wire name of the action type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Explore => "explore",
            Self::Attack => "attack",
            Self::UseItem => "useItem",
            Self::Pickup => "pickup",
            Self::Equip => "equip",
            Self::Rest => "rest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_terrain_deserializes_to_other() {
        let t: Result<Terrain, _> = serde_json::from_str("\"swamp\"");
        assert_eq!(t.ok(), Some(Terrain::Other));
        assert_eq!(Terrain::from_tag(" Hills "), Terrain::Hills);
    }

    #[test]
    fn unknown_status_is_waiting() {
        assert_eq!(GameStatus::from_tag("running"), GameStatus::Running);
        assert_eq!(GameStatus::from_tag("FINISHED"), GameStatus::Finished);
        assert_eq!(GameStatus::from_tag("paused"), GameStatus::Waiting);
    }

    #[test]
    fn action_type_wire_names() {
        let json = serde_json::to_string(&ActionType::UseItem).unwrap_or_default();
        assert_eq!(json, "\"useItem\"");
        assert_eq!(ActionType::Pickup.as_str(), "pickup");
    }
}
