//! Core entity structs for the Phase Quiz domain.
//!
//! Sessions and their phase results, token and phase configuration,
//! the question bank, administrator capability sets, and the analytics
//! summary served to the admin dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Capability, QuestionType};
use crate::ids::{AdminUserId, PhaseConfigId, PhaseResultId, QuestionId, SessionId, TokenConfigId};
use crate::phase::FIRST_PHASE;

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// One team's play-through of the game.
///
/// `total_tokens` is derived: it always equals the sum of `tokens_earned`
/// over the session's phase results and is recomputed on every phase
/// completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSession {
    /// Unique session identifier.
    pub id: SessionId,
    /// Name the team entered when starting.
    pub team_name: String,
    /// Sum of tokens earned across all recorded phases.
    pub total_tokens: i64,
    /// The phase the team is currently playing (1..=6, 6 = all done).
    pub current_phase: i32,
    /// Whether the team has finished the game.
    pub completed: bool,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
    /// When the session was last modified.
    pub updated_at: DateTime<Utc>,
    /// When the game was (most recently) marked complete.
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Start a fresh session in the first phase with no tokens.
    pub fn new(team_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            team_name: team_name.to_owned(),
            total_tokens: 0,
            current_phase: FIRST_PHASE,
            completed: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}

/// The outcome of one phase for one session.
///
/// At most one result exists per `(session_id, phase_number)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseResult {
    /// Unique result identifier.
    pub id: PhaseResultId,
    /// The owning session.
    pub session_id: SessionId,
    /// Which phase this result records.
    pub phase_number: i32,
    /// Tokens awarded for the phase.
    pub tokens_earned: i32,
    /// Seconds the team spent on the phase, if tracked.
    pub time_spent: Option<i32>,
    /// Free-form answer and challenge data captured by the client.
    pub answers_data: serde_json::Value,
    /// When the phase was first completed. Never updated on overwrite.
    pub completed_at: DateTime<Utc>,
}

/// A session together with all of its phase results.
///
/// This is the unit the progress engine and the analytics aggregator
/// operate on. Results are kept ordered by phase number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionRecord {
    /// The session itself.
    pub session: GameSession,
    /// Results recorded for the session, ordered by phase number.
    pub phase_results: Vec<PhaseResult>,
}

/// Input to the progress engine for a single phase completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseCompletion {
    /// Which phase was completed.
    pub phase_number: i32,
    /// Tokens the team earned in the phase.
    pub tokens_earned: i32,
    /// Seconds spent, if tracked.
    pub time_spent: Option<i32>,
    /// Answer payload; absent means an empty object.
    pub answers_data: Option<serde_json::Value>,
}

/// Result of recording a phase completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionProgress {
    /// The session after the update (new totals and phase).
    pub session: GameSession,
    /// The created or overwritten phase result.
    pub phase_result: PhaseResult,
    /// `true` when the result did not exist before this call.
    pub created: bool,
}

/// Compact session projection used by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionSummary {
    /// Session identifier.
    pub id: SessionId,
    /// Team name.
    pub team_name: String,
    /// Current token total.
    pub total_tokens: i64,
    /// Current phase.
    pub current_phase: i32,
    /// Number of phase results recorded.
    pub phases_completed: u32,
    /// Whether the game is finished.
    pub completed: bool,
    /// When the session was started.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Token bounds and reward settings for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenConfiguration {
    /// Record identifier.
    pub id: TokenConfigId,
    /// The phase this configuration applies to (unique, immutable).
    pub phase_number: i32,
    /// Minimum tokens a team can earn in the phase.
    pub min_tokens: i32,
    /// Maximum tokens a team can earn in the phase.
    pub max_tokens: i32,
    /// Additional phase-specific settings.
    pub config_data: serde_json::Value,
    /// Whether this configuration is in effect.
    pub is_active: bool,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

/// Write payload for a token configuration, keyed by phase number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TokenConfigInput {
    /// The phase to create or update.
    pub phase_number: i32,
    /// Minimum tokens (must not exceed `max_tokens`).
    pub min_tokens: i32,
    /// Maximum tokens.
    pub max_tokens: i32,
    /// Additional phase-specific settings.
    pub config_data: serde_json::Value,
    /// Whether the configuration is in effect.
    pub is_active: bool,
}

/// A token configuration item rejected during a bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RejectedTokenConfig {
    /// The phase number of the rejected item.
    pub phase_number: i32,
    /// Why the item was rejected.
    pub error: String,
}

/// Outcome of a bulk token configuration update.
///
/// Items are applied independently: valid items are persisted even when
/// others in the same batch are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BulkUpdateOutcome {
    /// Configurations that were written.
    pub updated: Vec<TokenConfiguration>,
    /// Items that failed validation.
    pub rejected: Vec<RejectedTokenConfig>,
}

/// General settings for one phase of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseConfiguration {
    /// Record identifier.
    pub id: PhaseConfigId,
    /// The phase this configuration applies to (unique, immutable).
    pub phase_number: i32,
    /// Display name.
    pub name: String,
    /// Longer description shown to teams.
    pub description: String,
    /// Time limit in seconds; `None` means unlimited.
    pub time_limit: Option<i32>,
    /// Whether the phase is played.
    pub is_enabled: bool,
    /// Additional phase-specific settings.
    pub config_data: serde_json::Value,
}

/// Write payload for a phase configuration, keyed by phase number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseConfigInput {
    /// The phase to create or update.
    pub phase_number: i32,
    /// Display name.
    pub name: String,
    /// Longer description.
    pub description: String,
    /// Time limit in seconds; `None` means unlimited.
    pub time_limit: Option<i32>,
    /// Whether the phase is played.
    pub is_enabled: bool,
    /// Additional phase-specific settings.
    pub config_data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

/// A question in the bank, belonging to one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Question identifier.
    pub id: QuestionId,
    /// The phase the question is used in.
    pub phase_number: i32,
    /// Kind of challenge.
    pub question_type: QuestionType,
    /// Prompt shown to the team.
    pub question_text: String,
    /// Answers and grading configuration.
    pub answer_data: serde_json::Value,
    /// Difficulty from 1 (easy) to 5 (hard).
    pub difficulty: i32,
    /// Tokens awarded for a correct answer.
    pub tokens_value: i32,
    /// Whether the question can be served.
    pub is_active: bool,
    /// When the question was added.
    pub created_at: DateTime<Utc>,
}

/// Write payload for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestionInput {
    /// The phase the question is used in.
    pub phase_number: i32,
    /// Kind of challenge.
    pub question_type: QuestionType,
    /// Prompt shown to the team.
    pub question_text: String,
    /// Answers and grading configuration.
    pub answer_data: serde_json::Value,
    /// Difficulty from 1 to 5.
    pub difficulty: i32,
    /// Tokens awarded for a correct answer.
    pub tokens_value: i32,
    /// Whether the question can be served.
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Administrators
// ---------------------------------------------------------------------------

/// Capability set attached to one authentication identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AdminUser {
    /// Record identifier.
    pub id: AdminUserId,
    /// The authentication identity this record belongs to (unique).
    pub user_id: String,
    /// May edit token configuration.
    pub can_modify_tokens: bool,
    /// May edit phase configuration and questions.
    pub can_modify_phases: bool,
    /// May read analytics.
    pub can_view_analytics: bool,
    /// May inspect and delete sessions.
    pub can_manage_sessions: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    /// Whether this administrator holds `capability`.
    pub const fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::ModifyTokens => self.can_modify_tokens,
            Capability::ModifyPhases => self.can_modify_phases,
            Capability::ViewAnalytics => self.can_view_analytics,
            Capability::ManageSessions => self.can_manage_sessions,
        }
    }

    /// All capabilities this administrator holds.
    pub fn capabilities(&self) -> Vec<Capability> {
        [
            Capability::ModifyTokens,
            Capability::ModifyPhases,
            Capability::ViewAnalytics,
            Capability::ManageSessions,
        ]
        .into_iter()
        .filter(|c| self.has(*c))
        .collect()
    }
}

/// Write payload for an administrator record, keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AdminUserInput {
    /// The authentication identity.
    pub user_id: String,
    /// May edit token configuration.
    pub can_modify_tokens: bool,
    /// May edit phase configuration and questions.
    pub can_modify_phases: bool,
    /// May read analytics.
    pub can_view_analytics: bool,
    /// May inspect and delete sessions.
    pub can_manage_sessions: bool,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// One entry of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TopTeam {
    /// Team name.
    pub team_name: String,
    /// Final token total.
    pub total_tokens: i64,
    /// When the team started.
    pub created_at: DateTime<Utc>,
}

/// Summary statistics over all sessions for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AnalyticsSummary {
    /// Number of sessions.
    pub total_sessions: u64,
    /// Number of completed sessions.
    pub completed_sessions: u64,
    /// Number of teams (one per session).
    pub total_teams: u64,
    /// Mean token total over all sessions; 0 when there are none.
    pub average_tokens: f64,
    /// Mean seconds from creation to completion over completed sessions.
    pub average_completion_time: Option<f64>,
    /// Count of phase results per phase, keyed `phase_1` .. `phase_5`.
    pub phase_completion_rates: BTreeMap<String, u64>,
    /// Up to ten completed sessions with the most tokens.
    pub top_teams: Vec<TopTeam>,
    /// Sessions created per calendar day (`YYYY-MM-DD`) over the
    /// trailing window. Days without sessions are absent.
    pub sessions_by_date: BTreeMap<String, u64>,
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn admin(tokens: bool, analytics: bool) -> AdminUser {
        AdminUser {
            id: AdminUserId::new(),
            user_id: "ops".to_owned(),
            can_modify_tokens: tokens,
            can_modify_phases: false,
            can_view_analytics: analytics,
            can_manage_sessions: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn new_session_starts_in_first_phase() {
        let now = Utc::now();
        let session = GameSession::new("Red Team", now);
        assert_eq!(session.current_phase, FIRST_PHASE);
        assert_eq!(session.total_tokens, 0);
        assert!(!session.completed);
        assert_eq!(session.created_at, now);
        assert_eq!(session.updated_at, now);
        assert!(session.completed_at.is_none());
    }

    #[test]
    fn capabilities_are_independent() {
        let a = admin(true, false);
        assert!(a.has(Capability::ModifyTokens));
        assert!(!a.has(Capability::ViewAnalytics));
        assert_eq!(a.capabilities(), vec![Capability::ModifyTokens]);

        let b = admin(false, true);
        assert_eq!(b.capabilities(), vec![Capability::ViewAnalytics]);
    }

    #[test]
    fn analytics_summary_serializes_null_completion_time() {
        let summary = AnalyticsSummary {
            total_sessions: 0,
            completed_sessions: 0,
            total_teams: 0,
            average_tokens: 0.0,
            average_completion_time: None,
            phase_completion_rates: BTreeMap::new(),
            top_teams: Vec::new(),
            sessions_by_date: BTreeMap::new(),
        };
        let json = serde_json::to_value(&summary).ok();
        assert_eq!(
            json.as_ref().map(|v| v["average_completion_time"].is_null()),
            Some(true)
        );
    }
}
