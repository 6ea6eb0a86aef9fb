//! Request bodies and query parameters, and their conversion into core
//! inputs.
//!
//! Bodies accept the camelCase field names sent by the web client
//! (`phaseNumber`, `tokensEarned`, ...) as aliases of the snake_case
//! names. Optional fields fall back to the same defaults the admin panel
//! assumes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use phasequiz_core::filter::{PhaseResultFilter, QuestionFilter, SessionFilter};
use phasequiz_types::{
    AdminUserInput, PhaseCompletion, PhaseConfigInput, QuestionInput, QuestionType, SessionId,
    TokenConfigInput,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

const fn default_true() -> bool {
    true
}

const fn default_max_tokens() -> i32 {
    100
}

const fn default_difficulty() -> i32 {
    1
}

const fn default_tokens_value() -> i32 {
    10
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Body of `POST /api/sessions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Team name. Trimmed and length-checked by the core.
    #[serde(alias = "teamName")]
    #[validate(length(min = 1, message = "team_name must not be empty"))]
    pub team_name: String,
}

/// Body of `POST /api/sessions/{id}/complete_phase`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompletePhaseRequest {
    /// Completed phase; required.
    #[serde(default, alias = "phaseNumber")]
    #[validate(
        required(message = "phase_number is required"),
        range(min = 1, message = "phase_number must be a positive integer")
    )]
    pub phase_number: Option<i32>,
    /// Tokens earned; defaults to 0.
    #[serde(default, alias = "tokensEarned")]
    pub tokens_earned: i32,
    /// Seconds spent.
    #[serde(default, alias = "timeSpent")]
    pub time_spent: Option<i32>,
    /// Answer payload.
    #[serde(default, alias = "answersData")]
    pub answers_data: Option<Value>,
}

impl CompletePhaseRequest {
    /// Convert into the progress engine input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBody`] if `phase_number` is missing.
    pub fn into_completion(self) -> Result<PhaseCompletion, ApiError> {
        let phase_number = self
            .phase_number
            .ok_or_else(|| ApiError::InvalidBody("phase_number is required".to_owned()))?;
        Ok(PhaseCompletion {
            phase_number,
            tokens_earned: self.tokens_earned,
            time_spent: self.time_spent,
            answers_data: self.answers_data,
        })
    }
}

/// Query of `GET /api/sessions`.
#[derive(Debug, Default, Deserialize)]
pub struct SessionsQuery {
    /// Completion state.
    pub completed: Option<bool>,
    /// Current phase.
    pub phase: Option<i32>,
    /// Earliest creation time (RFC 3339 or `YYYY-MM-DD`).
    pub date_from: Option<String>,
    /// Latest creation time (RFC 3339 or `YYYY-MM-DD`, inclusive).
    pub date_to: Option<String>,
}

impl SessionsQuery {
    /// Convert into a [`SessionFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidQuery`] for unparseable dates.
    pub fn into_filter(self) -> Result<SessionFilter, ApiError> {
        Ok(SessionFilter {
            completed: self.completed,
            phase: self.phase,
            date_from: self
                .date_from
                .as_deref()
                .map(|s| parse_instant(s, NaiveTime::MIN))
                .transpose()?,
            date_to: self
                .date_to
                .as_deref()
                .map(|s| parse_instant(s, end_of_day()))
                .transpose()?,
        })
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Parse an RFC 3339 instant, or a bare date at `time_of_day` UTC.
fn parse_instant(value: &str, time_of_day: NaiveTime) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(time_of_day).and_utc())
        .map_err(|e| ApiError::InvalidQuery(format!("invalid date {value:?}: {e}")))
}

/// Query of `GET /api/phases`.
#[derive(Debug, Default, Deserialize)]
pub struct PhasesQuery {
    /// Owning session ID.
    pub session: Option<String>,
    /// Phase number.
    pub phase: Option<i32>,
}

impl PhasesQuery {
    /// Convert into a [`PhaseResultFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUuid`] for a malformed session ID.
    pub fn into_filter(self) -> Result<PhaseResultFilter, ApiError> {
        Ok(PhaseResultFilter {
            session: self
                .session
                .as_deref()
                .map(parse_uuid)
                .transpose()?
                .map(SessionId::from),
            phase: self.phase,
        })
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Body of token configuration writes.
///
/// `phase_number` is required on `POST` and must be absent or unchanged
/// on `PUT /api/token-configs/{phase}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenConfigBody {
    /// Target phase.
    #[serde(default, alias = "phaseNumber")]
    pub phase_number: Option<i32>,
    /// Minimum tokens; defaults to 0.
    #[serde(default, alias = "minTokens")]
    pub min_tokens: i32,
    /// Maximum tokens; defaults to 100.
    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: i32,
    /// Extra settings.
    #[serde(default = "empty_object", alias = "configData")]
    pub config_data: Value,
    /// Active flag; defaults to true.
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,
}

impl TokenConfigBody {
    /// Convert into a core input for `phase` (or the body's own phase).
    ///
    /// A missing phase becomes 0, which core validation rejects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBody`] if the body names a different
    /// phase than the path.
    pub fn into_input(self, phase: Option<i32>) -> Result<TokenConfigInput, ApiError> {
        let phase_number = resolve_phase(phase, self.phase_number)?;
        Ok(TokenConfigInput {
            phase_number,
            min_tokens: self.min_tokens,
            max_tokens: self.max_tokens,
            config_data: self.config_data,
            is_active: self.is_active,
        })
    }
}

/// Body of `POST /api/token-configs/bulk_update`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkTokenConfigRequest {
    /// Items to apply.
    #[validate(length(min = 1, message = "configs must not be empty"))]
    pub configs: Vec<TokenConfigBody>,
}

/// Body of phase configuration writes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhaseConfigBody {
    /// Target phase.
    #[serde(default, alias = "phaseNumber")]
    pub phase_number: Option<i32>,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Time limit in seconds.
    #[serde(default, alias = "timeLimit")]
    pub time_limit: Option<i32>,
    /// Enabled flag; defaults to true.
    #[serde(default = "default_true", alias = "isEnabled")]
    pub is_enabled: bool,
    /// Extra settings.
    #[serde(default = "empty_object", alias = "configData")]
    pub config_data: Value,
}

impl PhaseConfigBody {
    /// Convert into a core input for `phase` (or the body's own phase).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBody`] if the body names a different
    /// phase than the path.
    pub fn into_input(self, phase: Option<i32>) -> Result<PhaseConfigInput, ApiError> {
        let phase_number = resolve_phase(phase, self.phase_number)?;
        Ok(PhaseConfigInput {
            phase_number,
            name: self.name,
            description: self.description,
            time_limit: self.time_limit,
            is_enabled: self.is_enabled,
            config_data: self.config_data,
        })
    }
}

/// Pick the phase from the path, falling back to the body. A body phase
/// that contradicts the path is rejected since phases are immutable.
fn resolve_phase(path: Option<i32>, body: Option<i32>) -> Result<i32, ApiError> {
    match (path, body) {
        (Some(p), Some(b)) if p != b => Err(ApiError::InvalidBody(format!(
            "phase_number cannot be changed (path {p}, body {b})"
        ))),
        (Some(p), _) => Ok(p),
        (None, b) => Ok(b.unwrap_or(0)),
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Body of question writes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionBody {
    /// Phase the question belongs to.
    #[serde(alias = "phaseNumber")]
    #[validate(range(min = 1, max = 5, message = "phase_number must be between 1 and 5"))]
    pub phase_number: i32,
    /// Question type.
    #[serde(alias = "questionType")]
    pub question_type: QuestionType,
    /// Prompt.
    #[serde(alias = "questionText")]
    #[validate(length(min = 1, message = "question_text must not be empty"))]
    pub question_text: String,
    /// Answers and grading configuration.
    #[serde(default = "empty_object", alias = "answerData")]
    pub answer_data: Value,
    /// Difficulty 1..=5; defaults to 1.
    #[serde(default = "default_difficulty")]
    #[validate(range(min = 1, max = 5, message = "difficulty must be between 1 and 5"))]
    pub difficulty: i32,
    /// Token value; defaults to 10.
    #[serde(default = "default_tokens_value", alias = "tokensValue")]
    pub tokens_value: i32,
    /// Active flag; defaults to true.
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,
}

impl From<QuestionBody> for QuestionInput {
    fn from(body: QuestionBody) -> Self {
        Self {
            phase_number: body.phase_number,
            question_type: body.question_type,
            question_text: body.question_text,
            answer_data: body.answer_data,
            difficulty: body.difficulty,
            tokens_value: body.tokens_value,
            is_active: body.is_active,
        }
    }
}

/// Query of `GET /api/questions`.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    /// Phase.
    pub phase: Option<i32>,
    /// Question type (`anagram`, `word_search`, ...).
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    /// Only active questions when `true`.
    pub active: Option<bool>,
}

impl QuestionsQuery {
    /// Convert into a [`QuestionFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidQuery`] for an unknown question type.
    pub fn into_filter(self) -> Result<QuestionFilter, ApiError> {
        Ok(QuestionFilter {
            phase: self.phase,
            question_type: parse_question_type(self.question_type.as_deref())?,
            active_only: self.active.unwrap_or(false),
        })
    }
}

/// Query of `GET /api/questions/random`.
#[derive(Debug, Default, Deserialize)]
pub struct RandomQuestionsQuery {
    /// Phase.
    pub phase: Option<i32>,
    /// Question type.
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    /// How many to return.
    pub count: Option<usize>,
}

impl RandomQuestionsQuery {
    /// Split into a filter and a count, using `default_count` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidQuery`] for an unknown question type.
    pub fn into_parts(self, default_count: usize) -> Result<(QuestionFilter, usize), ApiError> {
        let filter = QuestionFilter {
            phase: self.phase,
            question_type: parse_question_type(self.question_type.as_deref())?,
            active_only: true,
        };
        Ok((filter, self.count.unwrap_or(default_count)))
    }
}

fn parse_question_type(value: Option<&str>) -> Result<Option<QuestionType>, ApiError> {
    value
        .map(|v| {
            QuestionType::parse(v)
                .ok_or_else(|| ApiError::InvalidQuery(format!("unknown question type {v:?}")))
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// Administrators
// ---------------------------------------------------------------------------

/// Body of `PUT /api/admins/{user_id}`. Every capability defaults to
/// granted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminBody {
    /// May edit token configuration.
    #[serde(default = "default_true", alias = "canModifyTokens")]
    pub can_modify_tokens: bool,
    /// May edit phases and questions.
    #[serde(default = "default_true", alias = "canModifyPhases")]
    pub can_modify_phases: bool,
    /// May read analytics.
    #[serde(default = "default_true", alias = "canViewAnalytics")]
    pub can_view_analytics: bool,
    /// May inspect and delete sessions.
    #[serde(default = "default_true", alias = "canManageSessions")]
    pub can_manage_sessions: bool,
}

impl AdminBody {
    /// Convert into a core input for `user_id`.
    pub fn into_input(self, user_id: String) -> AdminUserInput {
        AdminUserInput {
            user_id,
            can_modify_tokens: self.can_modify_tokens,
            can_modify_phases: self.can_modify_phases,
            can_view_analytics: self.can_view_analytics,
            can_manage_sessions: self.can_manage_sessions,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a UUID from a string, returning an [`ApiError`] on failure.
pub fn parse_uuid(s: &str) -> Result<Uuid, ApiError> {
    s.parse::<Uuid>()
        .map_err(|e| ApiError::InvalidUuid(format!("{s}: {e}")))
}
