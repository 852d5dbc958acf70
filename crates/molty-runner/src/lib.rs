//! Process-level pieces of the Molty Royale agent.
//!
//! The binary in `main.rs` wires these together; they live in a library
//! target so the health router and bootstrap steps can be tested without
//! starting the process.
//!
//! # Modules
//!
//! - [`bootstrap`] -- Maintenance wait, account, game, and registration.
//! - [`error`] -- [`RunnerError`], the top-level error type.
//! - [`health`] -- Health and status HTTP endpoints and the
//!   [`StatusObserver`] that feeds them.
//! - [`settings`] -- Process settings read from the environment.
//!
//! [`RunnerError`]: error::RunnerError
//! [`StatusObserver`]: health::StatusObserver

pub mod bootstrap;
pub mod error;
pub mod health;
pub mod settings;
