//! Domain logic for the Phase Quiz game backend.
//!
//! Everything in this crate is independent of HTTP and of any particular
//! database. Pure functions do the work; the [`QuizStore`] trait is the
//! only seam to persistence.
//!
//! # Modules
//!
//! - [`progress`] -- Session progress engine: phase completion, token
//!   recomputation, and game completion.
//! - [`analytics`] -- Dashboard aggregation over all sessions.
//! - [`token_config`] -- Token bounds validation, active selection, and
//!   default records.
//! - [`phase_config`] -- Phase configuration validation and defaults.
//! - [`questions`] -- Question validation and random sampling.
//! - [`rewards`] -- Reward tables, presets, and the token calculator.
//! - [`views`] -- Derived read-only views (durations, summaries).
//! - [`filter`] -- Filter criteria for list queries.
//! - [`store`] -- [`QuizStore`] trait and store-generic operations.
//! - [`memory`] -- In-memory [`QuizStore`] implementation.
//! - [`config`] -- Configuration loading from `phasequiz-config.yaml`.
//! - [`error`] -- [`QuizError`].
//!
//! [`QuizStore`]: store::QuizStore
//! [`QuizError`]: error::QuizError

pub mod analytics;
pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod phase_config;
pub mod progress;
pub mod questions;
pub mod rewards;
pub mod store;
pub mod token_config;
pub mod views;

pub use error::QuizError;
pub use memory::MemoryStore;
pub use store::QuizStore;
