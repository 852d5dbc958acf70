//! The contract between the game loop and the remote game.
//!
//! The loop only needs two operations: read the current state and submit
//! one action. Everything below that (HTTP, authentication, response
//! shape normalisation, retries) lives behind [`RemoteSession`].

use std::future::Future;

use molty_types::{Action, StateSnapshot};

/// Why a remote call failed, classified for the loop's recovery policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The server is in its maintenance window.
    #[error("server under maintenance")]
    Maintenance,

    /// Network, timeout, or server-side failure that may clear on retry.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The response arrived but could not be turned into a snapshot.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The server rejected the request outright.
    #[error("request rejected: {0}")]
    Fatal(String),
}

impl SessionError {
    /// Whether this failure means the server is in maintenance.
    pub const fn is_maintenance(&self) -> bool {
        matches!(self, Self::Maintenance)
    }

    /// Whether this failure counts toward the consecutive-error limit.
    ///
    /// Everything except maintenance is counted.
    pub const fn is_counted(&self) -> bool {
        !self.is_maintenance()
    }
}

/// A live (game, agent) session on the remote server.
pub trait RemoteSession: Send + Sync {
    /// Fetch the agent's current view of the game.
    fn fetch_state(&self) -> impl Future<Output = Result<StateSnapshot, SessionError>> + Send;

    /// Submit exactly one action for the current turn.
    fn submit_action(&self, action: &Action)
    -> impl Future<Output = Result<(), SessionError>> + Send;
}
