//! Shared type definitions for the Molty Royale agent.
//!
//! This crate is the single source of truth for the values that flow
//! between the game API client, the decision policy, and the loop
//! controller. It carries no behavior beyond small accessors.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for server-issued identifiers
//! - [`enums`] -- Terrain, game status, item categories, unit kinds, action types
//! - [`snapshot`] -- The per-turn [`StateSnapshot`] read by the decision engine
//! - [`actions`] -- The [`Action`] produced each turn and its wire request

pub mod actions;
pub mod enums;
pub mod ids;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, ActionRequest};
pub use enums::{ActionType, GameStatus, ItemCategory, Terrain, UnitKind};
pub use ids::{AccountId, AgentId, Direction, GameId, ItemId, RegionId, UnitId};
pub use snapshot::{
    AdjacentRegion, AgentIdentity, GroundItem, Item, Location, StateSnapshot, Unit, Vitals,
};
