//! HTTP access to the Molty Royale game API.
//!
//! This crate turns the remote JSON API into the typed world of
//! `molty-types` and `molty-core`: it authenticates with the `X-API-Key`
//! header, unwraps the `{success, data}` envelope, classifies failures,
//! retries the idempotent calls with bounded exponential backoff, and
//! normalises the state response into a [`StateSnapshot`].
//!
//! # Modules
//!
//! - [`client`] -- [`ApiClient`], one method per endpoint.
//! - [`credentials`] -- The `api_key.txt` credentials file.
//! - [`error`] -- [`ApiError`] and its mapping onto `SessionError`.
//! - [`models`] -- Typed account, game, and registration payloads.
//! - [`normalize`] -- State response normalisation.
//! - [`retry`] -- [`RetryPolicy`] and [`with_retry`].
//! - [`session`] -- [`GameSession`], the `RemoteSession` implementation.
//!
//! [`StateSnapshot`]: molty_types::StateSnapshot
//! [`ApiClient`]: client::ApiClient
//! [`ApiError`]: error::ApiError
//! [`RetryPolicy`]: retry::RetryPolicy
//! [`with_retry`]: retry::with_retry
//! [`GameSession`]: session::GameSession

pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod normalize;
pub mod retry;
pub mod session;

pub use client::ApiClient;
pub use error::ApiError;
pub use session::GameSession;
