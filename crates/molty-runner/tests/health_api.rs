//! Integration tests for the health endpoints.
//!
//! The router is driven directly through `tower::ServiceExt` without a
//! TCP listener; the status observer is fed hand-built turn records.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use molty_core::game_loop::{LoopOutcome, LoopReport, TurnObserver, TurnRecord};
use molty_policy::Decision;
use molty_runner::health::{HealthState, SERVICE_NAME, StatusObserver, build_router};
use molty_types::{
    Action, AgentId, AgentIdentity, Direction, GameStatus, Location, RegionId, StateSnapshot,
    Vitals,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn snapshot() -> StateSnapshot {
    StateSnapshot {
        agent: AgentIdentity {
            id: AgentId::new("ag-1"),
            name: "ProBot_AI".to_owned(),
            is_alive: true,
        },
        vitals: Vitals {
            hp: 64,
            max_hp: 100,
            ep: 7,
            max_ep: 10,
            attack: 15,
            defense: 5,
            vision: 1,
        },
        location: Location {
            region_id: RegionId::new("r-1"),
            is_death_zone: false,
            terrain: None,
            adjacent: Vec::new(),
        },
        inventory: Vec::new(),
        equipped_weapon: None,
        units: Vec::new(),
        ground_items: Vec::new(),
        kills: 2,
        status: GameStatus::Running,
        turn: Some(12),
    }
}

async fn get_json(state: &Arc<HealthState>, uri: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_reports_service_banner() {
    let state = Arc::new(HealthState::new());
    let (status, json) = get_json(&state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], SERVICE_NAME);
    assert_eq!(json["status"], "running");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_reports_healthy_with_timestamp() {
    let state = Arc::new(HealthState::new());
    let (status, json) = get_json(&state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    let stamp = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[tokio::test]
async fn status_is_empty_before_the_first_turn() {
    let state = Arc::new(HealthState::new());
    let (status, json) = get_json(&state, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["last_turn"], Value::Null);
    assert_eq!(json["outcome"], Value::Null);
    assert_eq!(json["maintenance"], false);
}

#[tokio::test]
async fn observer_publishes_turns_and_outcome() {
    let state = Arc::new(HealthState::new());
    let mut observer = StatusObserver::new(Arc::clone(&state));

    observer.on_maintenance(true);
    let (_, json) = get_json(&state, "/status").await;
    assert_eq!(json["maintenance"], true);
    observer.on_maintenance(false);

    let snapshot = snapshot();
    let decision = Decision {
        action: Action::Move(Direction::new("north")),
        rule: "movement",
    };
    observer.on_turn(&TurnRecord {
        turn: 3,
        snapshot: &snapshot,
        decision: &decision,
        submitted: true,
        at: Utc::now(),
    });

    let (_, json) = get_json(&state, "/status").await;
    assert_eq!(json["maintenance"], false);
    assert_eq!(json["game_status"], "running");
    let last = &json["last_turn"];
    assert_eq!(last["turn"], 3);
    assert_eq!(last["game_turn"], 12);
    assert_eq!(last["rule"], "movement");
    assert_eq!(last["action"], json!({"action": "move", "target": "north"}));
    assert_eq!(last["submitted"], true);
    assert_eq!(last["hp"], 64);
    assert_eq!(last["kills"], 2);

    observer.on_finish(&LoopReport {
        outcome: LoopOutcome::GameFinished { kills: 2 },
        turns: 3,
        actions_submitted: 3,
        last_action_at: None,
    });
    let (_, json) = get_json(&state, "/status").await;
    assert_eq!(json["outcome"], json!({"reason": "game_finished", "kills": 2}));
}

#[tokio::test]
async fn turn_refused_for_maintenance_keeps_the_flag() {
    let state = Arc::new(HealthState::new());
    let mut observer = StatusObserver::new(Arc::clone(&state));

    let snapshot = snapshot();
    let decision = Decision {
        action: Action::Rest,
        rule: "fallback",
    };
    // The loop flags maintenance before reporting the refused turn.
    observer.on_maintenance(true);
    observer.on_turn(&TurnRecord {
        turn: 1,
        snapshot: &snapshot,
        decision: &decision,
        submitted: false,
        at: Utc::now(),
    });

    let (_, json) = get_json(&state, "/status").await;
    assert_eq!(json["maintenance"], true);
    assert_eq!(json["last_turn"]["submitted"], false);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let state = Arc::new(HealthState::new());
    let response = build_router(state)
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
