//! `PostgreSQL` data layer for the Phase Quiz backend.
//!
//! [`PgQuizStore`] implements [`phasequiz_core::QuizStore`] on top of
//! per-table stores that each borrow the shared pool:
//!
//! ```text
//! PgQuizStore
//!     |-- SessionStore   (game_sessions + phase_results, transactional completion)
//!     |-- ConfigStore    (token_configurations + phase_configurations)
//!     |-- QuestionStore  (questions, filtered listing, random sampling)
//!     +-- AdminStore     (admin_users)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, and migrations
//! - [`rows`] -- Row types and conversion into domain types
//! - [`session_store`] -- Sessions and phase results
//! - [`config_store`] -- Token and phase configuration
//! - [`question_store`] -- Question bank
//! - [`admin_store`] -- Administrator capability sets
//! - [`pg_store`] -- The [`QuizStore`](phasequiz_core::QuizStore) facade
//! - [`error`] -- Shared error types

pub mod admin_store;
pub mod config_store;
pub mod error;
pub mod pg_store;
pub mod postgres;
pub mod question_store;
pub mod rows;
pub mod session_store;

// Re-export primary types for convenience.
pub use admin_store::AdminStore;
pub use config_store::ConfigStore;
pub use error::DbError;
pub use pg_store::PgQuizStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use question_store::QuestionStore;
pub use session_store::SessionStore;
