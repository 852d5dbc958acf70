//! Game loop controller for the Molty Royale agent.
//!
//! This crate owns the per-turn cycle that drives one agent through one
//! game: Maintenance Check, Fetch, Decide+Act, and Wait. It knows nothing
//! about HTTP; the remote game is reached through the [`RemoteSession`]
//! contract and time through the [`Clock`] trait, so the whole loop runs
//! against fakes in tests.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait, [`SystemClock`], and the daily
//!   [`MaintenanceWindow`].
//! - [`config`] -- Configuration loading from `molty-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- [`StopSignal`] shared between the loop and the process.
//! - [`game_loop`] -- The resilient polling loop and its terminal outcomes.
//! - [`session`] -- [`RemoteSession`] trait and [`SessionError`].
//!
//! [`Clock`]: clock::Clock
//! [`SystemClock`]: clock::SystemClock
//! [`MaintenanceWindow`]: clock::MaintenanceWindow
//! [`StopSignal`]: control::StopSignal
//! [`RemoteSession`]: session::RemoteSession
//! [`SessionError`]: session::SessionError

pub mod clock;
pub mod config;
pub mod control;
pub mod game_loop;
pub mod session;
