//! Shared application state for the API server.
//!
//! [`AppState`] carries the store every handler talks to and the game
//! settings that shape analytics and question sampling. It is wrapped in
//! [`Arc`](std::sync::Arc) and injected via Axum's `State` extractor.

use phasequiz_core::QuizStore;
use phasequiz_core::analytics::AnalyticsOptions;
use phasequiz_core::config::GameConfig;

/// Shared state for the Axum application.
#[derive(Debug)]
pub struct AppState<S> {
    /// The backing store.
    pub store: S,
    /// Game rules (analytics window, leaderboard size, sampling default).
    pub game: GameConfig,
}

impl<S: QuizStore> AppState<S> {
    /// Create state over `store` with default game settings.
    pub fn new(store: S) -> Self {
        Self::with_game(store, GameConfig::default())
    }

    /// Create state over `store` with explicit game settings.
    pub const fn with_game(store: S, game: GameConfig) -> Self {
        Self { store, game }
    }

    /// Analytics options derived from the game settings.
    pub fn analytics_options(&self) -> AnalyticsOptions {
        AnalyticsOptions::from(&self.game)
    }
}
