//! HTTP API for the phase quiz game.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Game endpoints** for starting sessions, recording phase results
//!   and finishing games
//! - **Analytics** over all sessions for the admin dashboard
//! - **Admin endpoints** for token and phase configuration, the question
//!   bank and administrator capabilities
//!
//! # Architecture
//!
//! Handlers are thin: they parse and validate the request, call one
//! [`QuizStore`](phasequiz_core::QuizStore) operation (or a core helper
//! built on it) and shape the JSON response. All rules live in
//! `phasequiz-core`, so the router runs unchanged over the `PostgreSQL`
//! store in production and the in-memory store in tests.

pub mod admin;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
