//! Filter criteria for list queries.
//!
//! Each filter is a plain struct of optional predicates. The in-memory
//! store evaluates them with `matches`; the `PostgreSQL` store translates
//! the same structs into `WHERE` clauses. Combinations can therefore be
//! tested without a web layer or a database.

use chrono::{DateTime, Utc};
use phasequiz_types::{GameSession, PhaseResult, Question, QuestionType, SessionId};

/// Criteria for listing game sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// Only sessions with this completion state.
    pub completed: Option<bool>,
    /// Only sessions currently in this phase.
    pub phase: Option<i32>,
    /// Only sessions created at or after this instant.
    pub date_from: Option<DateTime<Utc>>,
    /// Only sessions created at or before this instant.
    pub date_to: Option<DateTime<Utc>>,
}

impl SessionFilter {
    /// Whether `session` satisfies every set criterion.
    pub fn matches(&self, session: &GameSession) -> bool {
        if let Some(completed) = self.completed
            && session.completed != completed
        {
            return false;
        }
        if let Some(phase) = self.phase
            && session.current_phase != phase
        {
            return false;
        }
        if let Some(from) = self.date_from
            && session.created_at < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && session.created_at > to
        {
            return false;
        }
        true
    }
}

/// Criteria for listing phase results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseResultFilter {
    /// Only results belonging to this session.
    pub session: Option<SessionId>,
    /// Only results for this phase.
    pub phase: Option<i32>,
}

impl PhaseResultFilter {
    /// Whether `result` satisfies every set criterion.
    pub fn matches(&self, result: &PhaseResult) -> bool {
        self.session.is_none_or(|s| result.session_id == s)
            && self.phase.is_none_or(|p| result.phase_number == p)
    }
}

/// Criteria for listing or sampling questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Only questions for this phase.
    pub phase: Option<i32>,
    /// Only questions of this type.
    pub question_type: Option<QuestionType>,
    /// Skip inactive questions.
    pub active_only: bool,
}

impl QuestionFilter {
    /// Whether `question` satisfies every set criterion.
    pub fn matches(&self, question: &Question) -> bool {
        (!self.active_only || question.is_active)
            && self.phase.is_none_or(|p| question.phase_number == p)
            && self.question_type.is_none_or(|t| question.question_type == t)
    }

    /// The same criteria restricted to active questions.
    #[must_use]
    pub const fn active(mut self) -> Self {
        self.active_only = true;
        self
    }
}
