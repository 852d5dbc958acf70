//! Health and status HTTP endpoints.
//!
//! The server runs as its own tokio task next to the game loop. The loop
//! never waits on it: [`StatusObserver`] publishes each turn with a
//! non-blocking `try_write`, and the handlers only read the last
//! published [`AgentStatus`].
//!
//! # Routes
//!
//! - `GET /` -- service banner with the crate version
//! - `GET /health` -- liveness probe
//! - `GET /status` -- the latest turn observed by the loop

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use molty_core::config::HealthConfig;
use molty_core::game_loop::{LoopOutcome, LoopReport, TurnObserver, TurnRecord};
use molty_types::{ActionRequest, GameStatus};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Molty Royale AI Agent";

/// Errors from the health server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("failed to bind to {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("server error: {0}")]
    Serve(String),
}

/// The most recent turn, as served by `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct LastTurn {
    /// Turn number within this run.
    pub turn: u64,
    /// Server-side turn counter, when reported.
    pub game_turn: Option<u64>,
    /// The action chosen, in wire form.
    pub action: ActionRequest,
    /// Name of the rule that chose it.
    pub rule: &'static str,
    /// Whether the server accepted the action.
    pub submitted: bool,
    /// Agent hit points when the decision was made.
    pub hp: u32,
    /// Agent energy points when the decision was made.
    pub ep: u32,
    /// Kills so far.
    pub kills: u32,
    /// When the turn was played.
    pub at: DateTime<Utc>,
}

/// What the loop has reported so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentStatus {
    /// Game status from the latest snapshot.
    pub game_status: Option<GameStatus>,
    /// Whether the loop is currently waiting out maintenance.
    pub maintenance: bool,
    /// The most recent played turn.
    pub last_turn: Option<LastTurn>,
    /// Why the loop stopped, once it has.
    pub outcome: Option<LoopOutcome>,
}

/// Shared state behind the router.
#[derive(Debug)]
pub struct HealthState {
    /// When the process started.
    pub started_at: DateTime<Utc>,
    /// Latest status published by the loop.
    pub status: RwLock<AgentStatus>,
}

impl HealthState {
    /// Fresh state stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            status: RwLock::new(AgentStatus::default()),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the Axum router with all health routes.
pub fn build_router(state: Arc<HealthState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/status", get(status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn status(State(state): State<Arc<HealthState>>) -> Json<serde_json::Value> {
    let status = state.status.read().await;
    Json(serde_json::json!({
        "started_at": state.started_at.to_rfc3339(),
        "game_status": status.game_status,
        "maintenance": status.maintenance,
        "last_turn": status.last_turn,
        "outcome": status.outcome,
    }))
}

/// Bind to the configured address and serve until the task is dropped.
pub async fn start_server(config: &HealthConfig, state: Arc<HealthState>) -> Result<(), ServerError> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind(format!("{addr}: {e}")))?;

    info!(addr = %addr, "Health server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    Ok(())
}

/// [`TurnObserver`] that publishes loop progress into [`HealthState`].
///
/// Uses `try_write` so a slow HTTP reader can never stall the loop; a
/// contended update is dropped and the next turn overwrites it anyway.
#[derive(Debug, Clone)]
pub struct StatusObserver {
    state: Arc<HealthState>,
}

impl StatusObserver {
    /// Observer writing into `state`.
    pub const fn new(state: Arc<HealthState>) -> Self {
        Self { state }
    }

    fn update(&self, what: &str, apply: impl FnOnce(&mut AgentStatus)) {
        if let Ok(mut status) = self.state.status.try_write() {
            apply(&mut status);
        } else {
            warn!(update = what, "Status lock contended, skipping update");
        }
    }
}

impl TurnObserver for StatusObserver {
    fn on_turn(&mut self, record: &TurnRecord<'_>) {
        let last = LastTurn {
            turn: record.turn,
            game_turn: record.snapshot.turn,
            action: ActionRequest::from(&record.decision.action),
            rule: record.decision.rule,
            submitted: record.submitted,
            hp: record.snapshot.vitals.hp,
            ep: record.snapshot.vitals.ep,
            kills: record.snapshot.kills,
            at: record.at,
        };
        let game_status = record.snapshot.status;
        self.update("turn", |status| {
            status.game_status = Some(game_status);
            status.last_turn = Some(last);
        });
    }

    fn on_maintenance(&mut self, active: bool) {
        self.update("maintenance", |status| status.maintenance = active);
    }

    fn on_finish(&mut self, report: &LoopReport) {
        let outcome = report.outcome;
        self.update("finish", |status| status.outcome = Some(outcome));
    }
}
