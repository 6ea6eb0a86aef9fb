//! Axum router construction for the quiz API.
//!
//! Assembles the game and admin routes into a single [`Router`] with
//! CORS middleware enabled for the browser client and admin panel.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use phasequiz_core::QuizStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router over `state`.
///
/// Static segments such as `/api/sessions/analytics` take precedence
/// over the `{id}` captures next to them.
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router<S: QuizStore>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Sessions
        .route(
            "/api/sessions",
            get(handlers::list_sessions::<S>).post(handlers::create_session::<S>),
        )
        .route("/api/sessions/analytics", get(handlers::analytics::<S>))
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session::<S>).delete(handlers::delete_session::<S>),
        )
        .route(
            "/api/sessions/{id}/complete_phase",
            post(handlers::complete_phase::<S>),
        )
        .route(
            "/api/sessions/{id}/complete_game",
            post(handlers::complete_game::<S>),
        )
        .route("/api/phases", get(handlers::list_phase_results::<S>))
        // Token configuration
        .route(
            "/api/token-configs",
            get(admin::list_token_configs::<S>).post(admin::create_token_config::<S>),
        )
        .route("/api/token-configs/active", get(admin::active_token_configs::<S>))
        .route("/api/token-configs/defaults", get(admin::default_rewards))
        .route("/api/token-configs/presets", get(admin::reward_presets))
        .route(
            "/api/token-configs/bulk_update",
            post(admin::bulk_update_token_configs::<S>),
        )
        .route("/api/token-configs/{phase}", put(admin::update_token_config::<S>))
        // Phase configuration
        .route(
            "/api/phase-configs",
            get(admin::list_phase_configs::<S>).post(admin::create_phase_config::<S>),
        )
        .route("/api/phase-configs/enabled", get(admin::enabled_phase_configs::<S>))
        .route("/api/phase-configs/{phase}", put(admin::update_phase_config::<S>))
        // Question bank
        .route(
            "/api/questions",
            get(admin::list_questions::<S>).post(admin::create_question::<S>),
        )
        .route("/api/questions/random", get(admin::random_questions::<S>))
        .route(
            "/api/questions/{id}",
            get(admin::get_question::<S>)
                .put(admin::update_question::<S>)
                .delete(admin::delete_question::<S>),
        )
        // Administrators
        .route(
            "/api/admins/{user_id}",
            get(admin::get_admin::<S>).put(admin::put_admin::<S>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
