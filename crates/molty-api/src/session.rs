//! [`RemoteSession`] over HTTP for one registered agent.

use std::sync::Arc;

use molty_core::session::{RemoteSession, SessionError};
use molty_types::{Action, AgentId, GameId, StateSnapshot};

use crate::client::ApiClient;

/// A (game, agent) pair bound to an authenticated [`ApiClient`].
#[derive(Debug, Clone)]
pub struct GameSession {
    client: Arc<ApiClient>,
    game_id: GameId,
    agent_id: AgentId,
}

impl GameSession {
    /// Bind `agent_id` in `game_id` to `client`.
    pub const fn new(client: Arc<ApiClient>, game_id: GameId, agent_id: AgentId) -> Self {
        Self {
            client,
            game_id,
            agent_id,
        }
    }

    /// Game this session plays in.
    pub const fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Agent this session controls.
    pub const fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }
}

impl RemoteSession for GameSession {
    async fn fetch_state(&self) -> Result<StateSnapshot, SessionError> {
        self.client
            .fetch_state(&self.game_id, &self.agent_id)
            .await
            .map_err(SessionError::from)
    }

    async fn submit_action(&self, action: &Action) -> Result<(), SessionError> {
        self.client
            .submit_action(&self.game_id, &self.agent_id, action)
            .await
            .map_err(SessionError::from)
    }
}
