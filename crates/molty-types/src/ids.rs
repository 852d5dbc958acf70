//! Type-safe identifier wrappers around server-issued strings.
//!
//! The game server hands out opaque string identifiers for every entity.
//! Wrapping each kind in its own newtype keeps a unit id from being passed
//! where an item id is expected, at no runtime cost.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id! {
    /// Identifier of the controlled agent inside one game.
    AgentId
}

define_id! {
    /// Identifier of a region (node in the game's area graph).
    RegionId
}

define_id! {
    /// Identifier of an item, in the inventory or on the ground.
    ItemId
}

define_id! {
    /// Identifier of a unit (another agent or a monster).
    UnitId
}

define_id! {
    /// Identifier of a game instance.
    GameId
}

define_id! {
    /// Identifier of the player account that owns the API key.
    AccountId
}

define_id! {
    /// Direction label of an adjacent region as reported by the server.
    ///
    /// The server chooses the vocabulary (compass points, region names);
    /// the agent only ever echoes it back in a `move` action.
    Direction
}
