//! Game-facing REST endpoint handlers.
//!
//! Every handler is generic over the [`QuizStore`] held in [`AppState`],
//! so the same code serves the `PostgreSQL` and in-memory backends.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness check |
//! | `GET` | `/api/sessions` | List sessions (filterable) |
//! | `POST` | `/api/sessions` | Start a session |
//! | `GET` | `/api/sessions/analytics` | Dashboard summary |
//! | `GET` | `/api/sessions/{id}` | Session detail with phase results |
//! | `DELETE` | `/api/sessions/{id}` | Delete a session and its results |
//! | `POST` | `/api/sessions/{id}/complete_phase` | Record a phase result |
//! | `POST` | `/api/sessions/{id}/complete_game` | Mark the game finished |
//! | `GET` | `/api/phases` | List phase results (filterable) |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use phasequiz_core::{QuizStore, store, views};
use phasequiz_types::{PhaseResult, SessionId, phase_name};

use crate::dto::{CompletePhaseRequest, CreateSessionRequest, PhasesQuery, SessionsQuery, parse_uuid};
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness check. Does not touch the store.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// List sessions, newest first.
///
/// # Query Parameters
///
/// - `completed`: `true` | `false`
/// - `phase`: current phase number
/// - `date_from` / `date_to`: RFC 3339 instant or `YYYY-MM-DD`
pub async fn list_sessions<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<SessionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.into_filter()?;
    let records = state.store.list_sessions(&filter).await?;
    let sessions: Vec<_> = records.iter().map(views::summarize).collect();

    Ok(Json(serde_json::json!({
        "count": sessions.len(),
        "sessions": sessions,
    })))
}

/// Start a new session for a team.
pub async fn create_session<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidatedJson(body): ValidatedJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.store.create_session(&body.team_name).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Session detail: the session, its phase results with display names,
/// how many phases are done and the elapsed time in seconds.
pub async fn get_session<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SessionId::from(parse_uuid(&id_str)?);
    let record = state.store.get_session(id).await?;

    let phase_results: Vec<serde_json::Value> =
        record.phase_results.iter().map(named_result).collect();

    Ok(Json(serde_json::json!({
        "session": record.session,
        "phase_results": phase_results,
        "phases_completed": views::phases_completed(&record),
        "duration": views::session_duration_secs(&record.session),
    })))
}

/// Delete a session; its phase results go with it.
pub async fn delete_session<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SessionId::from(parse_uuid(&id_str)?);
    state.store.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /api/sessions/{id}/complete_phase
// ---------------------------------------------------------------------------

/// Record (or overwrite) the result of one phase and return the new
/// totals.
pub async fn complete_phase<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
    ValidatedJson(body): ValidatedJson<CompletePhaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SessionId::from(parse_uuid(&id_str)?);
    let completion = body.into_completion()?;
    let progress = state.store.complete_phase(id, completion).await?;

    Ok(Json(serde_json::json!({
        "session_id": progress.session.id,
        "tokens_total": progress.session.total_tokens,
        "current_phase": progress.session.current_phase,
        "phase_result": progress.phase_result,
        "created": progress.created,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/sessions/{id}/complete_game
// ---------------------------------------------------------------------------

/// Mark the game finished. Any request body is ignored.
pub async fn complete_game<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SessionId::from(parse_uuid(&id_str)?);
    let session = state.store.complete_game(id).await?;

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "completed": session.completed,
        "completed_at": session.completed_at,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/sessions/analytics
// ---------------------------------------------------------------------------

/// Summary statistics over every session.
pub async fn analytics<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = store::analytics(&state.store, Utc::now(), state.analytics_options()).await?;
    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// GET /api/phases
// ---------------------------------------------------------------------------

/// List phase results across sessions.
///
/// # Query Parameters
///
/// - `session`: owning session ID
/// - `phase`: phase number
pub async fn list_phase_results<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<PhasesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.into_filter()?;
    let results = state.store.list_phase_results(&filter).await?;
    let phase_results: Vec<serde_json::Value> = results.iter().map(named_result).collect();

    Ok(Json(serde_json::json!({
        "count": phase_results.len(),
        "phase_results": phase_results,
    })))
}

/// A phase result with its display name attached.
fn named_result(result: &PhaseResult) -> serde_json::Value {
    serde_json::json!({
        "id": result.id,
        "session_id": result.session_id,
        "phase_number": result.phase_number,
        "phase_name": phase_name(result.phase_number),
        "tokens_earned": result.tokens_earned,
        "time_spent": result.time_spent,
        "answers_data": result.answers_data,
        "completed_at": result.completed_at,
    })
}
