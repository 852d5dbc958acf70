//! HTTP client for the Molty Royale game API.
//!
//! One method per endpoint. Every response goes through the same path:
//! status classification, JSON decoding, and envelope unwrapping. The
//! account, game, registration, and state calls are retried according to
//! the client's [`RetryPolicy`]; action submission is sent exactly once.

use molty_core::config::ApiConfig;
use molty_types::{Action, ActionRequest, AgentId, GameId, StateSnapshot};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::{AccountInfo, GameSummary, NameRequest, NewAccount, Registration};
use crate::normalize::snapshot_from_value;
use crate::retry::{RetryPolicy, with_retry};

/// Header carrying the account API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the game API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            retry: RetryPolicy::from(&config.retry),
        })
    }

    /// Replace the API key sent with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The API key in use, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    /// Create an account and obtain its API key.
    pub async fn create_account(&self, name: &str) -> Result<NewAccount, ApiError> {
        info!(name, "Creating account");
        let url = self.url("/accounts");
        let url = url.as_str();
        with_retry(&self.retry, "create_account", || async move {
            let request = self.http.post(url).json(&NameRequest { name });
            self.send_typed(request).await
        })
        .await
    }

    /// Fetch the account behind the current API key.
    pub async fn account_info(&self) -> Result<AccountInfo, ApiError> {
        let url = self.url("/accounts/me");
        let url = url.as_str();
        with_retry(&self.retry, "account_info", || async move {
            self.send_typed(self.http.get(url)).await
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Games
    // -----------------------------------------------------------------------

    /// List games that are waiting for players.
    pub async fn waiting_games(&self) -> Result<Vec<GameSummary>, ApiError> {
        let url = self.url("/games");
        let url = url.as_str();
        with_retry(&self.retry, "waiting_games", || async move {
            let request = self.http.get(url).query(&[("status", "waiting")]);
            self.send_typed(request).await
        })
        .await
    }

    /// Create a new game.
    pub async fn create_game(&self) -> Result<GameSummary, ApiError> {
        let url = self.url("/games");
        let url = url.as_str();
        with_retry(&self.retry, "create_game", || async move {
            self.send_typed(self.http.post(url)).await
        })
        .await
    }

    /// Register an agent called `name` in `game`.
    pub async fn register_agent(&self, game: &GameId, name: &str) -> Result<Registration, ApiError> {
        info!(game_id = %game, name, "Registering agent");
        let url = self.url(&format!("/games/{game}/agents/register"));
        let url = url.as_str();
        with_retry(&self.retry, "register_agent", || async move {
            let request = self.http.post(url).json(&NameRequest { name });
            self.send_typed(request).await
        })
        .await
    }

    // -----------------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------------

    /// Fetch and normalise the agent's view of the game.
    pub async fn fetch_state(&self, game: &GameId, agent: &AgentId) -> Result<StateSnapshot, ApiError> {
        let url = self.url(&format!("/games/{game}/agents/{agent}/state"));
        let url = url.as_str();
        let payload = with_retry(&self.retry, "fetch_state", || async move {
            self.send(self.http.get(url)).await
        })
        .await?;
        Ok(snapshot_from_value(&payload)?)
    }

    /// Submit one action. Never retried: a duplicate could act twice.
    pub async fn submit_action(
        &self,
        game: &GameId,
        agent: &AgentId,
        action: &Action,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/games/{game}/agents/{agent}/action"));
        let body = ActionRequest::from(action);
        debug!(action = %action, "Submitting action");
        self.send(self.http.post(url).json(&body))
            .await
            .map(drop)
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and return the payload inside the envelope.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ApiError::from_status(status, &body)
                .unwrap_or_else(|| ApiError::Decode(format!("unexpected status {status}"))));
        }

        let text = response.text().await?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::Decode(format!("invalid JSON: {e}")))?;
        open_envelope(json)
    }

    async fn send_typed<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let payload = self.send(request).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Reject `success: false` envelopes and strip successful ones.
fn open_envelope(json: Value) -> Result<Value, ApiError> {
    if json.get("success").and_then(Value::as_bool) == Some(false) {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| json.get(*key))
            .map_or_else(
                || "success: false".to_owned(),
                |detail| match detail {
                    Value::String(s) => s.clone(),
                    Value::Object(obj) => obj
                        .get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| detail.to_string(), ToOwned::to_owned),
                    other => other.to_string(),
                },
            );
        return Err(ApiError::Rejected(message));
    }
    match json {
        Value::Object(mut obj) if obj.contains_key("success") && obj.contains_key("data") => {
            Ok(obj.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}
