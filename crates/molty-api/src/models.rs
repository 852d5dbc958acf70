//! Typed payloads for the account, game, and registration endpoints.
//!
//! Only the fields the agent uses are modelled; everything else in the
//! server's responses is ignored.

use molty_types::{AccountId, AgentId, GameId, GameStatus};
use serde::{Deserialize, Serialize};

/// Account issued by `POST /accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// Account id.
    pub account_id: AccountId,
    /// API key for the `X-API-Key` header.
    pub api_key: String,
    /// Code used to claim the account on the website.
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// Account details from `GET /accounts/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account id, under either `id` or `accountId`.
    #[serde(alias = "accountId")]
    pub id: AccountId,
    /// Account name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A game as listed by `GET /games` or created by `POST /games`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// Game id.
    pub id: GameId,
    /// Raw lifecycle status tag, when reported.
    #[serde(default)]
    pub status: Option<String>,
}

impl GameSummary {
    /// Lifecycle status; unknown or missing tags read as waiting.
    pub fn status(&self) -> GameStatus {
        self.status
            .as_deref()
            .map_or(GameStatus::Waiting, GameStatus::from_tag)
    }
}

/// The agent created by `POST /games/{id}/agents/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Agent id inside the game.
    pub id: AgentId,
    /// Registered name.
    #[serde(default)]
    pub name: Option<String>,
    /// Starting hit points.
    #[serde(default)]
    pub hp: Option<u32>,
    /// Starting energy.
    #[serde(default)]
    pub ep: Option<u32>,
}

/// Request body for endpoints that take a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameRequest<'a> {
    /// Account or agent name.
    pub name: &'a str,
}
