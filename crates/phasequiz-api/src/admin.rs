//! Admin-panel endpoint handlers: token and phase configuration, the
//! question bank and administrator capabilities.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/token-configs` | All token configurations |
//! | `POST` | `/api/token-configs` | Create or replace one |
//! | `GET` | `/api/token-configs/active` | Active ones only |
//! | `GET` | `/api/token-configs/defaults` | Built-in reward table |
//! | `GET` | `/api/token-configs/presets` | Preset reward tables |
//! | `POST` | `/api/token-configs/bulk_update` | Apply many, partial success |
//! | `PUT` | `/api/token-configs/{phase}` | Replace one |
//! | `GET` | `/api/phase-configs` | All phase configurations |
//! | `POST` | `/api/phase-configs` | Create or replace one |
//! | `GET` | `/api/phase-configs/enabled` | Enabled ones only |
//! | `PUT` | `/api/phase-configs/{phase}` | Replace one |
//! | `GET` | `/api/questions` | List questions (filterable) |
//! | `POST` | `/api/questions` | Create a question |
//! | `GET` | `/api/questions/random` | Random active questions |
//! | `GET` | `/api/questions/{id}` | One question |
//! | `PUT` | `/api/questions/{id}` | Replace a question |
//! | `DELETE` | `/api/questions/{id}` | Delete a question |
//! | `GET` | `/api/admins/{user_id}` | Capability set |
//! | `PUT` | `/api/admins/{user_id}` | Create or replace capabilities |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use phasequiz_core::phase_config::select_enabled;
use phasequiz_core::rewards::{DEFAULT_REWARDS, PRESETS, TokenCalculator};
use phasequiz_core::store;
use phasequiz_core::token_config::select_active;
use phasequiz_core::QuizStore;
use phasequiz_types::QuestionId;

use crate::dto::{
    AdminBody, BulkTokenConfigRequest, PhaseConfigBody, QuestionBody, QuestionsQuery,
    RandomQuestionsQuery, TokenConfigBody, parse_uuid,
};
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Token configuration
// ---------------------------------------------------------------------------

/// All token configurations in phase order.
pub async fn list_token_configs<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let configs = state.store.list_token_configs().await?;
    Ok(Json(serde_json::json!({
        "count": configs.len(),
        "token_configs": configs,
    })))
}

/// Active token configurations in phase order.
pub async fn active_token_configs<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let configs = select_active(&state.store.list_token_configs().await?);
    Ok(Json(serde_json::json!({
        "count": configs.len(),
        "token_configs": configs,
    })))
}

/// Create or replace the token configuration named in the body.
pub async fn create_token_config<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidatedJson(body): ValidatedJson<TokenConfigBody>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.store.upsert_token_config(body.into_input(None)?).await?;
    Ok(Json(config))
}

/// Replace the token configuration for `phase`.
pub async fn update_token_config<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(phase): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<TokenConfigBody>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.store.upsert_token_config(body.into_input(Some(phase))?).await?;
    Ok(Json(config))
}

/// Apply several token configurations. Invalid items are reported and
/// skipped; valid ones are written.
pub async fn bulk_update_token_configs<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidatedJson(body): ValidatedJson<BulkTokenConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let items = body
        .configs
        .into_iter()
        .map(|item| item.into_input(None))
        .collect::<Result<Vec<_>, _>>()?;
    let outcome = store::bulk_update_token_configs(&state.store, items).await?;
    Ok(Json(outcome))
}

/// The built-in reward table.
pub async fn default_rewards() -> impl IntoResponse {
    Json(serde_json::json!({
        "config": DEFAULT_REWARDS,
        "max_possible": TokenCalculator::new(DEFAULT_REWARDS).max_possible(),
    }))
}

/// Every preset reward table with its maximum possible total.
pub async fn reward_presets() -> impl IntoResponse {
    let presets: Vec<serde_json::Value> = PRESETS
        .iter()
        .map(|preset| {
            serde_json::json!({
                "id": preset.id,
                "name": preset.name,
                "description": preset.description,
                "config": preset.config,
                "max_possible": TokenCalculator::new(preset.config).max_possible(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": presets.len(),
        "presets": presets,
    }))
}

// ---------------------------------------------------------------------------
// Phase configuration
// ---------------------------------------------------------------------------

/// All phase configurations in phase order.
pub async fn list_phase_configs<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let configs = state.store.list_phase_configs().await?;
    Ok(Json(serde_json::json!({
        "count": configs.len(),
        "phase_configs": configs,
    })))
}

/// Enabled phase configurations in phase order.
pub async fn enabled_phase_configs<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let configs = select_enabled(&state.store.list_phase_configs().await?);
    Ok(Json(serde_json::json!({
        "count": configs.len(),
        "phase_configs": configs,
    })))
}

/// Create or replace the phase configuration named in the body.
pub async fn create_phase_config<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidatedJson(body): ValidatedJson<PhaseConfigBody>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.store.upsert_phase_config(body.into_input(None)?).await?;
    Ok(Json(config))
}

/// Replace the phase configuration for `phase`.
pub async fn update_phase_config<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(phase): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<PhaseConfigBody>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.store.upsert_phase_config(body.into_input(Some(phase))?).await?;
    Ok(Json(config))
}

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

/// List questions.
///
/// # Query Parameters
///
/// - `phase`: phase number
/// - `type`: `anagram` | `word_search` | `multiple_choice` | `true_false`
/// - `active`: `true` to skip inactive questions
pub async fn list_questions<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<QuestionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.into_filter()?;
    let questions = state.store.list_questions(&filter).await?;
    Ok(Json(serde_json::json!({
        "count": questions.len(),
        "questions": questions,
    })))
}

/// Up to `count` random active questions.
///
/// # Query Parameters
///
/// - `phase`, `type`: as for [`list_questions`]
/// - `count`: how many (default from `game.random_question_count`)
pub async fn random_questions<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiQuery(params): ApiQuery<RandomQuestionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, count) = params.into_parts(state.game.random_question_count)?;
    let questions = state.store.random_questions(&filter, count).await?;
    Ok(Json(serde_json::json!({
        "count": questions.len(),
        "questions": questions,
    })))
}

/// One question.
pub async fn get_question<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = QuestionId::from(parse_uuid(&id_str)?);
    Ok(Json(state.store.get_question(id).await?))
}

/// Add a question to the bank.
pub async fn create_question<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ValidatedJson(body): ValidatedJson<QuestionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let question = state.store.create_question(body.into()).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Replace a question's content.
pub async fn update_question<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
    ValidatedJson(body): ValidatedJson<QuestionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = QuestionId::from(parse_uuid(&id_str)?);
    Ok(Json(state.store.update_question(id, body.into()).await?))
}

/// Remove a question from the bank.
pub async fn delete_question<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(id_str): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = QuestionId::from(parse_uuid(&id_str)?);
    state.store.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Administrators
// ---------------------------------------------------------------------------

/// The capability set for `user_id`.
pub async fn get_admin<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state.store.get_admin(&user_id).await?;
    Ok(Json(serde_json::json!({
        "admin": admin,
        "capabilities": admin.capabilities(),
    })))
}

/// Create or replace the capability set for `user_id`.
pub async fn put_admin<S: QuizStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiPath(user_id): ApiPath<String>,
    ValidatedJson(body): ValidatedJson<AdminBody>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state.store.upsert_admin(body.into_input(user_id)).await?;
    Ok(Json(admin))
}
