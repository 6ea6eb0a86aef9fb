//! Row types for every table and their conversion into domain types.
//!
//! Rows mirror the column layout exactly and carry raw [`Uuid`]s and
//! strings; `into_domain` wraps IDs in their newtypes and parses enum
//! columns, failing with [`DbError::InvalidRow`] on values the schema
//! should have rejected.

use chrono::{DateTime, Utc};
use phasequiz_types::{
    AdminUser, AdminUserId, GameSession, PhaseConfigId, PhaseConfiguration, PhaseResult,
    PhaseResultId, Question, QuestionId, QuestionType, SessionId, TokenConfigId,
    TokenConfiguration,
};
use uuid::Uuid;

use crate::error::DbError;

/// Column list for `game_sessions`, in [`SessionRow`] order.
pub(crate) const SESSION_COLUMNS: &str =
    "id, team_name, total_tokens, current_phase, completed, created_at, updated_at, completed_at";

/// Column list for `phase_results`, in [`PhaseResultRow`] order.
pub(crate) const PHASE_RESULT_COLUMNS: &str =
    "id, session_id, phase_number, tokens_earned, time_spent, answers_data, completed_at";

/// Column list for `questions`, in [`QuestionRow`] order.
pub(crate) const QUESTION_COLUMNS: &str = "id, phase_number, question_type, question_text, \
     answer_data, difficulty, tokens_value, is_active, created_at";

/// A row from `game_sessions`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    /// Session ID.
    pub id: Uuid,
    /// Team name.
    pub team_name: String,
    /// Derived token total.
    pub total_tokens: i64,
    /// Current phase.
    pub current_phase: i32,
    /// Completion flag.
    pub completed: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// Convert into the domain type.
    pub fn into_domain(self) -> GameSession {
        GameSession {
            id: SessionId::from(self.id),
            team_name: self.team_name,
            total_tokens: self.total_tokens,
            current_phase: self.current_phase,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        }
    }
}

/// A row from `phase_results`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhaseResultRow {
    /// Result ID.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// Phase number.
    pub phase_number: i32,
    /// Tokens earned.
    pub tokens_earned: i32,
    /// Seconds spent.
    pub time_spent: Option<i32>,
    /// Answer payload.
    pub answers_data: serde_json::Value,
    /// First completion time.
    pub completed_at: DateTime<Utc>,
}

impl PhaseResultRow {
    /// Convert into the domain type.
    pub fn into_domain(self) -> PhaseResult {
        PhaseResult {
            id: PhaseResultId::from(self.id),
            session_id: SessionId::from(self.session_id),
            phase_number: self.phase_number,
            tokens_earned: self.tokens_earned,
            time_spent: self.time_spent,
            answers_data: self.answers_data,
            completed_at: self.completed_at,
        }
    }
}

/// A row from `token_configurations`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenConfigRow {
    /// Record ID.
    pub id: Uuid,
    /// Phase number.
    pub phase_number: i32,
    /// Minimum tokens.
    pub min_tokens: i32,
    /// Maximum tokens.
    pub max_tokens: i32,
    /// Extra settings.
    pub config_data: serde_json::Value,
    /// Active flag.
    pub is_active: bool,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

impl TokenConfigRow {
    /// Convert into the domain type.
    pub fn into_domain(self) -> TokenConfiguration {
        TokenConfiguration {
            id: TokenConfigId::from(self.id),
            phase_number: self.phase_number,
            min_tokens: self.min_tokens,
            max_tokens: self.max_tokens,
            config_data: self.config_data,
            is_active: self.is_active,
            updated_at: self.updated_at,
        }
    }
}

/// A row from `phase_configurations`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhaseConfigRow {
    /// Record ID.
    pub id: Uuid,
    /// Phase number.
    pub phase_number: i32,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Time limit in seconds.
    pub time_limit: Option<i32>,
    /// Enabled flag.
    pub is_enabled: bool,
    /// Extra settings.
    pub config_data: serde_json::Value,
}

impl PhaseConfigRow {
    /// Convert into the domain type.
    pub fn into_domain(self) -> PhaseConfiguration {
        PhaseConfiguration {
            id: PhaseConfigId::from(self.id),
            phase_number: self.phase_number,
            name: self.name,
            description: self.description,
            time_limit: self.time_limit,
            is_enabled: self.is_enabled,
            config_data: self.config_data,
        }
    }
}

/// A row from `questions`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionRow {
    /// Question ID.
    pub id: Uuid,
    /// Phase number.
    pub phase_number: i32,
    /// Question type as stored (`anagram`, `word_search`, ...).
    pub question_type: String,
    /// Prompt.
    pub question_text: String,
    /// Answers.
    pub answer_data: serde_json::Value,
    /// Difficulty 1..=5.
    pub difficulty: i32,
    /// Token value.
    pub tokens_value: i32,
    /// Active flag.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl QuestionRow {
    /// Convert into the domain type.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if `question_type` is unknown.
    pub fn into_domain(self) -> Result<Question, DbError> {
        let question_type =
            QuestionType::parse(&self.question_type).ok_or_else(|| DbError::InvalidRow {
                table: "questions",
                reason: format!("unknown question_type {:?}", self.question_type),
            })?;
        Ok(Question {
            id: QuestionId::from(self.id),
            phase_number: self.phase_number,
            question_type,
            question_text: self.question_text,
            answer_data: self.answer_data,
            difficulty: self.difficulty,
            tokens_value: self.tokens_value,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

/// A row from `admin_users`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminRow {
    /// Record ID.
    pub id: Uuid,
    /// Authentication identity.
    pub user_id: String,
    /// Capability flag.
    pub can_modify_tokens: bool,
    /// Capability flag.
    pub can_modify_phases: bool,
    /// Capability flag.
    pub can_view_analytics: bool,
    /// Capability flag.
    pub can_manage_sessions: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl AdminRow {
    /// Convert into the domain type.
    pub fn into_domain(self) -> AdminUser {
        AdminUser {
            id: AdminUserId::from(self.id),
            user_id: self.user_id,
            can_modify_tokens: self.can_modify_tokens,
            can_modify_phases: self.can_modify_phases,
            can_view_analytics: self.can_view_analytics,
            can_manage_sessions: self.can_manage_sessions,
            created_at: self.created_at,
        }
    }
}
