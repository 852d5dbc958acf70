//! Integration tests for the start-up sequence.
//!
//! A local Axum server stands in for the game API; clocks are simulated
//! so the maintenance wait never sleeps for real.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, TimeZone, Utc};
use molty_api::ApiError;
use molty_api::credentials::Credentials;
use molty_core::clock::{Clock, MaintenanceWindow};
use molty_core::config::AgentConfig;
use molty_core::control::StopSignal;
use molty_runner::bootstrap::{bootstrap, wait_out_maintenance};
use molty_runner::error::RunnerError;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Mock game API
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Mock {
    accounts_created: AtomicU32,
    games_created: AtomicU32,
    no_waiting_games: AtomicBool,
    registered: tokio::sync::Mutex<Vec<(String, String)>>,
}

type Shared = Arc<Mock>;

async fn create_account(State(mock): State<Shared>) -> Json<Value> {
    mock.accounts_created.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "success": true,
        "data": {"accountId": "acc-9", "apiKey": "fresh-key", "verificationCode": "VC-9"}
    }))
}

async fn account_me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        Some("good" | "fresh-key") => (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"id": "acc-1"}})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "invalid key"})),
        ),
    }
}

async fn list_games(State(mock): State<Shared>) -> Json<Value> {
    if mock.no_waiting_games.load(Ordering::SeqCst) {
        return Json(json!({"success": true, "data": []}));
    }
    Json(json!({"success": true, "data": [{"id": "g-1", "status": "waiting"}]}))
}

async fn create_game(State(mock): State<Shared>) -> Json<Value> {
    mock.games_created.fetch_add(1, Ordering::SeqCst);
    Json(json!({"success": true, "data": {"id": "g-new", "status": "waiting"}}))
}

async fn register(
    State(mock): State<Shared>,
    Path(game): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if game == "g-new" && body["name"] == "Full_AI" {
        return Json(json!({"success": false, "error": {"message": "Game is full"}}));
    }
    let name = body["name"].as_str().unwrap_or_default().to_owned();
    mock.registered.lock().await.push((game, name.clone()));
    Json(json!({"success": true, "data": {"id": "ag-7", "name": name, "hp": 100, "ep": 10}}))
}

async fn start_mock() -> (String, Shared) {
    let mock: Shared = Arc::new(Mock::default());
    let app = Router::new()
        .route("/api/accounts", post(create_account))
        .route("/api/accounts/me", get(account_me))
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/games/{game}/agents/register", post(register))
        .with_state(Arc::clone(&mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), mock)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct SimClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl SimClock {
    fn at(h: u32, m: u32) -> Self {
        Self {
            now: Arc::new(Mutex::new(
                Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap(),
            )),
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        let now = Arc::clone(&self.now);
        async move {
            {
                let mut guard = now.lock().unwrap();
                *guard += chrono::Duration::from_std(duration).unwrap();
            }
            tokio::task::yield_now().await;
        }
    }
}

fn credentials_path(test: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "molty-bootstrap-{}-{test}.txt",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn config(base_url: &str, api_key: Option<&str>, credentials: &std::path::Path) -> AgentConfig {
    let mut config = AgentConfig::default();
    config.api.base_url = base_url.to_owned();
    config.api.api_key = api_key.map(ToOwned::to_owned);
    config.api.credentials_file = credentials.display().to_string();
    config.api.retry.min_delay_ms = 1;
    config.api.retry.max_delay_ms = 5;
    config
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn configured_key_is_reused() {
    let (base, mock) = start_mock().await;
    let path = credentials_path("reuse");
    let config = config(&base, Some("good"), &path);

    let session = bootstrap(&config, &SimClock::at(12, 0), &StopSignal::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.game_id().as_str(), "g-1");
    assert_eq!(session.agent_id().as_str(), "ag-7");
    assert_eq!(mock.accounts_created.load(Ordering::SeqCst), 0);
    assert_eq!(
        mock.registered.lock().await.clone(),
        vec![("g-1".to_owned(), "ProBot_AI".to_owned())]
    );
    assert!(!path.exists());
}

#[tokio::test]
async fn new_account_is_created_and_saved() {
    let (base, mock) = start_mock().await;
    let path = credentials_path("create");
    let config = config(&base, None, &path);

    let session = bootstrap(&config, &SimClock::at(12, 0), &StopSignal::new())
        .await
        .unwrap();

    assert!(session.is_some());
    assert_eq!(mock.accounts_created.load(Ordering::SeqCst), 1);
    let saved = Credentials::read_from(&path).unwrap().unwrap();
    assert_eq!(saved.api_key, "fresh-key");
    assert_eq!(saved.verification_code.as_deref(), Some("VC-9"));
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn refused_saved_key_is_replaced() {
    let (base, mock) = start_mock().await;
    let path = credentials_path("refused");
    std::fs::write(&path, "API Key: stale\n").unwrap();
    let config = config(&base, None, &path);

    bootstrap(&config, &SimClock::at(12, 0), &StopSignal::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(mock.accounts_created.load(Ordering::SeqCst), 1);
    let saved = Credentials::read_from(&path).unwrap().unwrap();
    assert_eq!(saved.api_key, "fresh-key");
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn accepted_saved_key_skips_account_creation() {
    let (base, mock) = start_mock().await;
    let path = credentials_path("saved");
    std::fs::write(&path, "API Key: good\nAccount ID: acc-1\n").unwrap();
    let config = config(&base, None, &path);

    bootstrap(&config, &SimClock::at(12, 0), &StopSignal::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(mock.accounts_created.load(Ordering::SeqCst), 0);
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn game_is_created_when_none_is_waiting() {
    let (base, mock) = start_mock().await;
    mock.no_waiting_games.store(true, Ordering::SeqCst);
    let path = credentials_path("newgame");
    let config = config(&base, Some("good"), &path);

    let session = bootstrap(&config, &SimClock::at(12, 0), &StopSignal::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(session.game_id().as_str(), "g-new");
    assert_eq!(mock.games_created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn registration_rejection_is_an_error() {
    let (base, mock) = start_mock().await;
    mock.no_waiting_games.store(true, Ordering::SeqCst);
    let path = credentials_path("full");
    let mut config = config(&base, Some("good"), &path);
    config.agent.name = "Full".to_owned();

    let result = bootstrap(&config, &SimClock::at(12, 0), &StopSignal::new()).await;

    assert!(matches!(
        result,
        Err(RunnerError::Api { source: ApiError::Rejected(ref m) }) if m == "Game is full"
    ));
}

#[tokio::test]
async fn stop_during_maintenance_skips_the_server() {
    let (base, mock) = start_mock().await;
    let path = credentials_path("stopped");
    let config = config(&base, None, &path);
    let stop = StopSignal::new();
    stop.request_stop();

    let result = bootstrap(&config, &SimClock::at(10, 0), &stop).await.unwrap();

    assert!(result.is_none());
    assert_eq!(mock.accounts_created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn maintenance_wait_polls_until_the_window_closes() {
    let clock = SimClock::at(10, 0);
    let proceed = wait_out_maintenance(&clock, &MaintenanceWindow::default(), &StopSignal::new()).await;

    assert!(proceed);
    assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 6, 1, 10, 31, 0).unwrap());
}

#[tokio::test]
async fn outside_the_window_there_is_no_wait() {
    let clock = SimClock::at(8, 15);
    assert!(wait_out_maintenance(&clock, &MaintenanceWindow::default(), &StopSignal::new()).await);
    assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 6, 1, 8, 15, 0).unwrap());
}
