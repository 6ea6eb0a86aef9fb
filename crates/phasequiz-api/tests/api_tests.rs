//! Integration tests for the quiz API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, backed by the in-memory store. This validates
//! handler logic, routing and error mapping without a database.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::too_many_lines)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use phasequiz_api::router::build_router;
use phasequiz_api::state::AppState;
use phasequiz_core::MemoryStore;
use phasequiz_core::config::GameConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

fn make_app() -> Router {
    build_router(Arc::new(AppState::new(MemoryStore::new())))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request and return the status and decoded JSON body
/// (`Value::Null` for empty bodies).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn create_session(app: &Router, team_name: &str) -> String {
    let (status, json) = send(
        app,
        json_request(Method::POST, "/api/sessions", &json!({"team_name": team_name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_owned()
}

async fn complete_phase(app: &Router, id: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            &format!("/api/sessions/{id}/complete_phase"),
            body,
        ),
    )
    .await
}

// =========================================================================
// Health
// =========================================================================

#[tokio::test]
async fn health_returns_ok() {
    let app = make_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
}

// =========================================================================
// Sessions
// =========================================================================

#[tokio::test]
async fn create_session_starts_at_phase_one() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(Method::POST, "/api/sessions", &json!({"team_name": "Owls"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["team_name"], "Owls");
    assert_eq!(json["current_phase"], 1);
    assert_eq!(json["total_tokens"], 0);
    assert_eq!(json["completed"], false);
    assert!(json["completed_at"].is_null());
}

#[tokio::test]
async fn create_session_rejects_empty_team_name() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(Method::POST, "/api/sessions", &json!({"team_name": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = make_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sessions")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn session_detail_includes_results_and_duration() {
    let app = make_app();
    let id = create_session(&app, "Lynx").await;
    complete_phase(&app, &id, &json!({"phase_number": 1, "tokens_earned": 25})).await;

    let (status, json) = get(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session"]["id"], id.as_str());
    assert_eq!(json["phases_completed"], 1);
    assert_eq!(json["phase_results"][0]["phase_number"], 1);
    assert!(json["phase_results"][0]["phase_name"].is_string());
    assert!(json["duration"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = make_app();
    let (status, json) = get(&app, "/api/sessions/0192f0c1-0000-7000-8000-000000000000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn invalid_uuid_is_bad_request() {
    let app = make_app();
    let (status, json) = get(&app, "/api/sessions/not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not-a-uuid"));
}

#[tokio::test]
async fn list_sessions_filters_by_completion() {
    let app = make_app();
    let done = create_session(&app, "Finishers").await;
    create_session(&app, "Stragglers").await;
    send(
        &app,
        json_request(
            Method::POST,
            &format!("/api/sessions/{done}/complete_game"),
            &json!({}),
        ),
    )
    .await;

    let (status, json) = get(&app, "/api/sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);

    let (_, json) = get(&app, "/api/sessions?completed=true").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["sessions"][0]["team_name"], "Finishers");

    let (_, json) = get(&app, "/api/sessions?completed=false&phase=1").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["sessions"][0]["team_name"], "Stragglers");
}

#[tokio::test]
async fn list_sessions_rejects_bad_dates() {
    let app = make_app();
    let (status, _) = get(&app, "/api/sessions?date_from=last-week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = get(&app, "/api/sessions?date_from=2000-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn team_name_is_trimmed_before_length_check() {
    let app = make_app();
    let padded = format!("  {}  ", "a".repeat(127));
    let (status, json) = send(
        &app,
        json_request(Method::POST, "/api/sessions", &json!({"team_name": padded})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["team_name"].as_str().unwrap().len(), 127);

    let too_long = "b".repeat(129);
    let (status, json) = send(
        &app,
        json_request(Method::POST, "/api/sessions", &json!({"team_name": too_long})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn malformed_query_and_path_params_use_error_shape() {
    let app = make_app();

    let (status, json) = get(&app, "/api/sessions?completed=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].is_string());

    let (status, json) = get(&app, "/api/questions/random?count=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("count"));

    let (status, json) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/token-configs/abc",
            &json!({"min_tokens": 0, "max_tokens": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].is_string());

    let (status, json) = send(
        &app,
        json_request(Method::PUT, "/api/phase-configs/x", &json!({"name": "Intro"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn delete_session_removes_it() {
    let app = make_app();
    let id = create_session(&app, "Ephemeral").await;

    let request = Request::delete(format!("/api/sessions/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Progress
// =========================================================================

#[tokio::test]
async fn complete_phase_accumulates_tokens() {
    let app = make_app();
    let id = create_session(&app, "Falcons").await;

    let (status, json) =
        complete_phase(&app, &id, &json!({"phase_number": 1, "tokens_earned": 30})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], id.as_str());
    assert_eq!(json["tokens_total"], 30);
    assert_eq!(json["current_phase"], 2);
    assert_eq!(json["created"], true);
    assert_eq!(json["phase_result"]["answers_data"], json!({}));

    let (_, json) =
        complete_phase(&app, &id, &json!({"phase_number": 2, "tokens_earned": 20})).await;
    assert_eq!(json["tokens_total"], 50);
    assert_eq!(json["current_phase"], 3);
}

#[tokio::test]
async fn overwriting_a_phase_replaces_its_tokens() {
    let app = make_app();
    let id = create_session(&app, "Retriers").await;

    complete_phase(&app, &id, &json!({"phase_number": 1, "tokens_earned": 30})).await;
    let (status, json) =
        complete_phase(&app, &id, &json!({"phase_number": 1, "tokens_earned": 10})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["created"], false);
    assert_eq!(json["tokens_total"], 10);
    assert_eq!(json["current_phase"], 2);
}

#[tokio::test]
async fn jumping_ahead_advances_past_the_completed_phase() {
    let app = make_app();
    let id = create_session(&app, "Skippers").await;

    let (status, json) =
        complete_phase(&app, &id, &json!({"phase_number": 3, "tokens_earned": 40})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_phase"], 4);

    // Completing an earlier phase never moves the session backwards.
    let (_, json) =
        complete_phase(&app, &id, &json!({"phase_number": 1, "tokens_earned": 5})).await;
    assert_eq!(json["current_phase"], 4);
    assert_eq!(json["tokens_total"], 45);
}

#[tokio::test]
async fn final_phase_moves_to_finished_marker() {
    let app = make_app();
    let id = create_session(&app, "Closers").await;

    let (_, json) = complete_phase(&app, &id, &json!({"phase_number": 5})).await;
    assert_eq!(json["current_phase"], 6);
    assert_eq!(json["tokens_total"], 0);
}

#[tokio::test]
async fn complete_phase_accepts_camel_case_fields() {
    let app = make_app();
    let id = create_session(&app, "Camels").await;

    let (status, json) = complete_phase(
        &app,
        &id,
        &json!({"phaseNumber": 2, "tokensEarned": 15, "timeSpent": 90, "answersData": {"story": 1}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tokens_total"], 15);
    assert_eq!(json["phase_result"]["time_spent"], 90);
    assert_eq!(json["phase_result"]["answers_data"]["story"], 1);
}

#[tokio::test]
async fn complete_phase_requires_phase_number() {
    let app = make_app();
    let id = create_session(&app, "Forgetful").await;

    let (status, json) = complete_phase(&app, &id, &json!({"tokens_earned": 10})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = complete_phase(&app, &id, &json!({"phase_number": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = complete_phase(&app, &id, &json!({"phase_number": 9})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was recorded.
    let (_, json) = get(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(json["phases_completed"], 0);
}

#[tokio::test]
async fn complete_phase_on_unknown_session_is_not_found() {
    let app = make_app();
    let (status, _) = complete_phase(
        &app,
        "0192f0c1-0000-7000-8000-000000000000",
        &json!({"phase_number": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complete_game_marks_session_finished() {
    let app = make_app();
    let id = create_session(&app, "Winners").await;

    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/api/sessions/{id}/complete_game"),
            &json!({}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], id.as_str());
    assert_eq!(json["completed"], true);
    assert!(json["completed_at"].is_string());
}

#[tokio::test]
async fn phases_endpoint_filters_results() {
    let app = make_app();
    let a = create_session(&app, "Alpha").await;
    let b = create_session(&app, "Beta").await;
    complete_phase(&app, &a, &json!({"phase_number": 1, "tokens_earned": 10})).await;
    complete_phase(&app, &a, &json!({"phase_number": 2, "tokens_earned": 10})).await;
    complete_phase(&app, &b, &json!({"phase_number": 1, "tokens_earned": 10})).await;

    let (_, json) = get(&app, "/api/phases").await;
    assert_eq!(json["count"], 3);

    let (_, json) = get(&app, &format!("/api/phases?session={a}")).await;
    assert_eq!(json["count"], 2);

    let (_, json) = get(&app, "/api/phases?phase=1").await;
    assert_eq!(json["count"], 2);

    let (status, _) = get(&app, "/api/phases?session=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Analytics
// =========================================================================

#[tokio::test]
async fn analytics_on_empty_store_is_all_zero() {
    let app = make_app();
    let (status, json) = get(&app, "/api/sessions/analytics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_sessions"], 0);
    assert_eq!(json["completed_sessions"], 0);
    assert_eq!(json["total_teams"], 0);
    assert_eq!(json["average_tokens"], 0.0);
    assert!(json["average_completion_time"].is_null());
    assert_eq!(json["top_teams"], json!([]));
    assert_eq!(json["sessions_by_date"], json!({}));
}

#[tokio::test]
async fn analytics_summarizes_sessions() {
    let app = make_app();
    let winner = create_session(&app, "Winners").await;
    let runner = create_session(&app, "Runners").await;
    create_session(&app, "Idle").await;

    complete_phase(&app, &winner, &json!({"phase_number": 1, "tokens_earned": 60})).await;
    complete_phase(&app, &runner, &json!({"phase_number": 1, "tokens_earned": 30})).await;
    for id in [&winner, &runner] {
        send(
            &app,
            json_request(
                Method::POST,
                &format!("/api/sessions/{id}/complete_game"),
                &json!({}),
            ),
        )
        .await;
    }

    let (_, json) = get(&app, "/api/sessions/analytics").await;
    assert_eq!(json["total_sessions"], 3);
    assert_eq!(json["completed_sessions"], 2);
    assert_eq!(json["average_tokens"], 30.0);
    assert_eq!(json["phase_completion_rates"]["phase_1"], 2);
    assert_eq!(json["top_teams"][0]["team_name"], "Winners");
    assert_eq!(json["top_teams"][1]["team_name"], "Runners");
    let per_day: u64 = json["sessions_by_date"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(per_day, 3);
}

#[tokio::test]
async fn analytics_respects_top_teams_limit() {
    let game = GameConfig {
        top_teams_limit: 1,
        ..GameConfig::default()
    };
    let app = build_router(Arc::new(AppState::with_game(MemoryStore::new(), game)));

    for team in ["One", "Two"] {
        let id = create_session(&app, team).await;
        send(
            &app,
            json_request(
                Method::POST,
                &format!("/api/sessions/{id}/complete_game"),
                &json!({}),
            ),
        )
        .await;
    }

    let (_, json) = get(&app, "/api/sessions/analytics").await;
    assert_eq!(json["top_teams"].as_array().unwrap().len(), 1);
}

// =========================================================================
// Token configuration
// =========================================================================

#[tokio::test]
async fn token_config_create_and_update() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            "/api/token-configs",
            &json!({"phase_number": 1, "min_tokens": 0, "max_tokens": 180}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max_tokens"], 180);
    assert_eq!(json["is_active"], true);

    let (status, json) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/token-configs/1",
            &json!({"minTokens": 10, "maxTokens": 120, "isActive": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase_number"], 1);
    assert_eq!(json["min_tokens"], 10);
    assert_eq!(json["is_active"], false);

    let (_, json) = get(&app, "/api/token-configs").await;
    assert_eq!(json["count"], 1);
    let (_, json) = get(&app, "/api/token-configs/active").await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn token_config_rejects_inverted_bounds() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            "/api/token-configs",
            &json!({"phase_number": 2, "min_tokens": 50, "max_tokens": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (_, json) = get(&app, "/api/token-configs").await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn token_config_phase_cannot_change() {
    let app = make_app();
    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/token-configs/2",
            &json!({"phase_number": 3, "min_tokens": 0, "max_tokens": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_update_reports_partial_success() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            "/api/token-configs/bulk_update",
            &json!({"configs": [
                {"phase_number": 1, "min_tokens": 0, "max_tokens": 50},
                {"phase_number": 2, "min_tokens": 90, "max_tokens": 10},
                {"phase_number": 3, "min_tokens": 5, "max_tokens": 5},
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updated"].as_array().unwrap().len(), 2);
    assert_eq!(json["rejected"].as_array().unwrap().len(), 1);
    assert_eq!(json["rejected"][0]["phase_number"], 2);

    let (_, json) = get(&app, "/api/token-configs").await;
    assert_eq!(json["count"], 2);
}

#[tokio::test]
async fn bulk_update_rejects_empty_list() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            "/api/token-configs/bulk_update",
            &json!({"configs": []}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn reward_defaults_and_presets() {
    let app = make_app();
    let (status, json) = get(&app, "/api/token-configs/defaults").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["phase1"]["completion"], 15);
    assert_eq!(json["config"]["phase1"]["timeBonus"], 10);
    assert_eq!(json["config"]["phase2"]["challengeSelection"], 5);
    assert_eq!(json["config"]["phase5"]["incorrect"], 15);

    let (_, json) = get(&app, "/api/token-configs/presets").await;
    assert_eq!(json["count"], 4);
    let ids: Vec<&str> = json["presets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        ["balanced", "high-stakes", "learning-focused", "competitive"]
    );
}

// =========================================================================
// Phase configuration
// =========================================================================

#[tokio::test]
async fn phase_config_lifecycle() {
    let app = make_app();
    let (status, json) = send(
        &app,
        json_request(
            Method::POST,
            "/api/phase-configs",
            &json!({"phase_number": 1, "name": "Anagrams", "time_limit": 180}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["time_limit"], 180);
    assert_eq!(json["is_enabled"], true);

    send(
        &app,
        json_request(
            Method::PUT,
            "/api/phase-configs/2",
            &json!({"name": "Stories", "isEnabled": false}),
        ),
    )
    .await;

    let (_, json) = get(&app, "/api/phase-configs").await;
    assert_eq!(json["count"], 2);
    let (_, json) = get(&app, "/api/phase-configs/enabled").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["phase_configs"][0]["phase_number"], 1);
}

#[tokio::test]
async fn phase_config_rejects_bad_input() {
    let app = make_app();
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/phase-configs",
            &json!({"phase_number": 1, "name": "Timed", "time_limit": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/phase-configs/8",
            &json!({"name": "Bonus"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Question bank
// =========================================================================

async fn create_question(app: &Router, phase: i32, question_type: &str, active: bool) -> Value {
    let (status, json) = send(
        app,
        json_request(
            Method::POST,
            "/api/questions",
            &json!({
                "phase_number": phase,
                "question_type": question_type,
                "question_text": format!("{question_type} question"),
                "answer_data": {"correct": true},
                "is_active": active,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

#[tokio::test]
async fn question_crud() {
    let app = make_app();
    let created = create_question(&app, 3, "multiple_choice", true).await;
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(created["difficulty"], 1);
    assert_eq!(created["tokens_value"], 10);

    let (status, json) = get(&app, &format!("/api/questions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["question_type"], "multiple_choice");

    let (status, json) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/questions/{id}"),
            &json!({
                "phase_number": 3,
                "question_type": "true_false",
                "question_text": "Revised",
                "difficulty": 4,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["question_type"], "true_false");
    assert_eq!(json["difficulty"], 4);

    let request = Request::delete(format!("/api/questions/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/api/questions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn question_validation() {
    let app = make_app();
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/questions",
            &json!({
                "phase_number": 3,
                "question_type": "anagram",
                "question_text": "Too hard",
                "difficulty": 9,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/questions",
            &json!({
                "phase_number": 3,
                "question_type": "essay",
                "question_text": "Unknown type",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn question_list_filters() {
    let app = make_app();
    create_question(&app, 1, "anagram", true).await;
    create_question(&app, 1, "word_search", true).await;
    create_question(&app, 3, "multiple_choice", false).await;

    let (_, json) = get(&app, "/api/questions").await;
    assert_eq!(json["count"], 3);
    let (_, json) = get(&app, "/api/questions?phase=1").await;
    assert_eq!(json["count"], 2);
    let (_, json) = get(&app, "/api/questions?type=word_search").await;
    assert_eq!(json["count"], 1);
    let (_, json) = get(&app, "/api/questions?active=true").await;
    assert_eq!(json["count"], 2);

    let (status, _) = get(&app, "/api/questions?type=essay").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn random_questions_cap_at_available_matches() {
    let app = make_app();
    for _ in 0..3 {
        create_question(&app, 4, "true_false", true).await;
    }
    create_question(&app, 4, "true_false", false).await;
    create_question(&app, 5, "true_false", true).await;

    let (status, json) = get(&app, "/api/questions/random?phase=4&count=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert!(
        json["questions"]
            .as_array()
            .unwrap()
            .iter()
            .all(|q| q["phase_number"] == 4 && q["is_active"] == true)
    );

    let (_, json) = get(&app, "/api/questions/random?phase=4&count=2").await;
    assert_eq!(json["count"], 2);

    let (_, json) = get(&app, "/api/questions/random?phase=2").await;
    assert_eq!(json["count"], 0);
}

// =========================================================================
// Administrators
// =========================================================================

#[tokio::test]
async fn admin_capabilities_roundtrip() {
    let app = make_app();
    let (status, _) = get(&app, "/api/admins/coach-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/admins/coach-1",
            &json!({"can_modify_tokens": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], "coach-1");
    assert_eq!(json["can_modify_tokens"], false);
    assert_eq!(json["can_view_analytics"], true);

    let (status, json) = get(&app, "/api/admins/coach-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["admin"]["can_modify_phases"], true);
    assert_eq!(json["capabilities"].as_array().unwrap().len(), 3);
}
