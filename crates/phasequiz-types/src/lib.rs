//! Shared domain types for the Phase Quiz game backend.
//!
//! This crate is the single source of truth for all types used across the
//! workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the game client and the admin panel.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all record identifiers
//! - [`enums`] -- Question types and administrator capabilities
//! - [`phase`] -- Phase numbering constants and labels
//! - [`structs`] -- Sessions, results, configuration, questions, analytics

pub mod enums;
pub mod ids;
pub mod phase;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Capability, QuestionType};
pub use ids::{AdminUserId, PhaseConfigId, PhaseResultId, QuestionId, SessionId, TokenConfigId};
pub use phase::{FINISHED_PHASE, FIRST_PHASE, TOTAL_PHASES, all_phases, is_valid_phase, phase_name};
pub use structs::{
    AdminUser, AdminUserInput, AnalyticsSummary, BulkUpdateOutcome, GameSession, PhaseCompletion,
    PhaseConfigInput, PhaseConfiguration, PhaseResult, Question, QuestionInput,
    RejectedTokenConfig, SessionProgress, SessionRecord, SessionSummary, TokenConfigInput,
    TokenConfiguration, TopTeam,
};
