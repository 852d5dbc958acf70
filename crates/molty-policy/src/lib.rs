//! Decision policy for the Molty Royale agent.
//!
//! Given one [`StateSnapshot`], the policy produces exactly one [`Action`].
//! The policy is a hand-tuned heuristic: independent, stateless rule
//! functions combined by a fixed priority cascade in [`engine`].
//!
//! # Modules
//!
//! - [`terrain`] -- Static terrain desirability scores.
//! - [`combat`] -- Attack and flee predicates.
//! - [`items`] -- Healing need and best-item selection.
//! - [`death_zone`] -- Death zone detection and escape direction.
//! - [`random`] -- Injectable randomness ([`RandomSource`]).
//! - [`engine`] -- The ordered rule cascade ([`decide`], [`evaluate`]).
//!
//! [`StateSnapshot`]: molty_types::StateSnapshot
//! [`Action`]: molty_types::Action

pub mod combat;
pub mod death_zone;
pub mod engine;
pub mod items;
pub mod random;
pub mod terrain;

#[cfg(test)]
mod test_support;

pub use combat::{CombatReason, CombatVerdict, should_attack, should_flee};
pub use engine::{CASCADE, Decision, Rule, decide, evaluate};
pub use random::{FixedRandom, RandomSource, RngSource};
