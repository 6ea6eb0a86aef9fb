//! In-process [`QuizStore`] backed by hash maps behind one
//! [`tokio::sync::RwLock`].
//!
//! Used for local play without a database and as the store behind the
//! API integration tests. Every mutation runs inside a single write-lock
//! critical section, which makes `complete_phase` atomic and serializes
//! concurrent completions on the same session.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use phasequiz_types::{
    AdminUser, AdminUserId, AdminUserInput, GameSession, PhaseCompletion, PhaseConfigId,
    PhaseConfigInput, PhaseConfiguration, PhaseResult, Question, QuestionId, QuestionInput,
    SessionId, SessionProgress, SessionRecord, TokenConfigId, TokenConfigInput,
    TokenConfiguration,
};
use tokio::sync::RwLock;

use crate::error::QuizError;
use crate::filter::{PhaseResultFilter, QuestionFilter, SessionFilter};
use crate::phase_config::validate_phase_config;
use crate::progress;
use crate::questions::{select_random_questions, validate_question};
use crate::store::QuizStore;
use crate::token_config::validate_token_config;

#[derive(Debug, Default)]
struct Tables {
    sessions: HashMap<SessionId, SessionRecord>,
    token_configs: BTreeMap<i32, TokenConfiguration>,
    phase_configs: BTreeMap<i32, PhaseConfiguration>,
    questions: HashMap<QuestionId, Question>,
    admins: HashMap<String, AdminUser>,
}

/// A [`QuizStore`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn session_not_found(id: SessionId) -> QuizError {
    QuizError::not_found(format!("session {id}"))
}

fn question_not_found(id: QuestionId) -> QuizError {
    QuizError::not_found(format!("question {id}"))
}

impl QuizStore for MemoryStore {
    async fn create_session(&self, team_name: &str) -> Result<GameSession, QuizError> {
        let session = progress::start_session(team_name, Utc::now())?;
        let mut tables = self.tables.write().await;
        tables.sessions.insert(
            session.id,
            SessionRecord {
                session: session.clone(),
                phase_results: Vec::new(),
            },
        );
        tracing::info!(session_id = %session.id, team = %session.team_name, "session created");
        Ok(session)
    }

    async fn get_session(&self, id: SessionId) -> Result<SessionRecord, QuizError> {
        let tables = self.tables.read().await;
        tables.sessions.get(&id).cloned().ok_or_else(|| session_not_found(id))
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>, QuizError> {
        let tables = self.tables.read().await;
        let mut records: Vec<SessionRecord> = tables
            .sessions
            .values()
            .filter(|r| filter.matches(&r.session))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.session
                .created_at
                .cmp(&a.session.created_at)
                .then_with(|| b.session.id.cmp(&a.session.id))
        });
        Ok(records)
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), QuizError> {
        let mut tables = self.tables.write().await;
        tables.sessions.remove(&id).ok_or_else(|| session_not_found(id))?;
        tracing::info!(session_id = %id, "session deleted");
        Ok(())
    }

    async fn complete_phase(
        &self,
        id: SessionId,
        completion: PhaseCompletion,
    ) -> Result<SessionProgress, QuizError> {
        progress::validate_phase_number(completion.phase_number)?;
        let mut tables = self.tables.write().await;
        let record = tables.sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        let outcome = progress::complete_phase(record, completion, Utc::now())?;
        tracing::info!(
            session_id = %id,
            phase = outcome.phase_result.phase_number,
            tokens_total = outcome.session.total_tokens,
            current_phase = outcome.session.current_phase,
            created = outcome.created,
            "phase completed"
        );
        Ok(outcome)
    }

    async fn complete_game(&self, id: SessionId) -> Result<GameSession, QuizError> {
        let mut tables = self.tables.write().await;
        let record = tables.sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        progress::complete_game(&mut record.session, Utc::now());
        tracing::info!(session_id = %id, tokens_total = record.session.total_tokens, "game completed");
        Ok(record.session.clone())
    }

    async fn list_phase_results(
        &self,
        filter: &PhaseResultFilter,
    ) -> Result<Vec<PhaseResult>, QuizError> {
        let tables = self.tables.read().await;
        let mut results: Vec<PhaseResult> = tables
            .sessions
            .values()
            .flat_map(|r| r.phase_results.iter())
            .filter(|pr| filter.matches(pr))
            .cloned()
            .collect();
        results.sort_by_key(|pr| (pr.session_id, pr.phase_number));
        Ok(results)
    }

    async fn list_token_configs(&self) -> Result<Vec<TokenConfiguration>, QuizError> {
        let tables = self.tables.read().await;
        Ok(tables.token_configs.values().cloned().collect())
    }

    async fn upsert_token_config(
        &self,
        input: TokenConfigInput,
    ) -> Result<TokenConfiguration, QuizError> {
        validate_token_config(&input)?;
        let mut tables = self.tables.write().await;
        let id = tables
            .token_configs
            .get(&input.phase_number)
            .map_or_else(TokenConfigId::new, |c| c.id);
        let config = TokenConfiguration {
            id,
            phase_number: input.phase_number,
            min_tokens: input.min_tokens,
            max_tokens: input.max_tokens,
            config_data: input.config_data,
            is_active: input.is_active,
            updated_at: Utc::now(),
        };
        tables.token_configs.insert(config.phase_number, config.clone());
        tracing::info!(
            phase = config.phase_number,
            min_tokens = config.min_tokens,
            max_tokens = config.max_tokens,
            "token configuration saved"
        );
        Ok(config)
    }

    async fn list_phase_configs(&self) -> Result<Vec<PhaseConfiguration>, QuizError> {
        let tables = self.tables.read().await;
        Ok(tables.phase_configs.values().cloned().collect())
    }

    async fn upsert_phase_config(
        &self,
        input: PhaseConfigInput,
    ) -> Result<PhaseConfiguration, QuizError> {
        validate_phase_config(&input)?;
        let mut tables = self.tables.write().await;
        let id = tables
            .phase_configs
            .get(&input.phase_number)
            .map_or_else(PhaseConfigId::new, |c| c.id);
        let config = PhaseConfiguration {
            id,
            phase_number: input.phase_number,
            name: input.name,
            description: input.description,
            time_limit: input.time_limit,
            is_enabled: input.is_enabled,
            config_data: input.config_data,
        };
        tables.phase_configs.insert(config.phase_number, config.clone());
        tracing::info!(phase = config.phase_number, enabled = config.is_enabled, "phase configuration saved");
        Ok(config)
    }

    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, QuizError> {
        let tables = self.tables.read().await;
        let mut questions: Vec<Question> =
            tables.questions.values().filter(|q| filter.matches(q)).cloned().collect();
        questions.sort_by(|a, b| {
            a.phase_number
                .cmp(&b.phase_number)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(questions)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Question, QuizError> {
        let tables = self.tables.read().await;
        tables.questions.get(&id).cloned().ok_or_else(|| question_not_found(id))
    }

    async fn create_question(&self, input: QuestionInput) -> Result<Question, QuizError> {
        validate_question(&input)?;
        let question = Question {
            id: QuestionId::new(),
            phase_number: input.phase_number,
            question_type: input.question_type,
            question_text: input.question_text,
            answer_data: input.answer_data,
            difficulty: input.difficulty,
            tokens_value: input.tokens_value,
            is_active: input.is_active,
            created_at: Utc::now(),
        };
        let mut tables = self.tables.write().await;
        tables.questions.insert(question.id, question.clone());
        tracing::info!(question_id = %question.id, phase = question.phase_number, "question created");
        Ok(question)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        input: QuestionInput,
    ) -> Result<Question, QuizError> {
        validate_question(&input)?;
        let mut tables = self.tables.write().await;
        let question = tables.questions.get_mut(&id).ok_or_else(|| question_not_found(id))?;
        question.phase_number = input.phase_number;
        question.question_type = input.question_type;
        question.question_text = input.question_text;
        question.answer_data = input.answer_data;
        question.difficulty = input.difficulty;
        question.tokens_value = input.tokens_value;
        question.is_active = input.is_active;
        tracing::info!(question_id = %id, "question updated");
        Ok(question.clone())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), QuizError> {
        let mut tables = self.tables.write().await;
        tables.questions.remove(&id).ok_or_else(|| question_not_found(id))?;
        tracing::info!(question_id = %id, "question deleted");
        Ok(())
    }

    async fn random_questions(
        &self,
        filter: &QuestionFilter,
        count: usize,
    ) -> Result<Vec<Question>, QuizError> {
        let pool: Vec<Question> = {
            let tables = self.tables.read().await;
            tables.questions.values().cloned().collect()
        };
        let mut rng = rand::rng();
        Ok(select_random_questions(pool, filter, count, &mut rng))
    }

    async fn get_admin(&self, user_id: &str) -> Result<AdminUser, QuizError> {
        let tables = self.tables.read().await;
        tables
            .admins
            .get(user_id)
            .cloned()
            .ok_or_else(|| QuizError::not_found(format!("admin user {user_id}")))
    }

    async fn upsert_admin(&self, input: AdminUserInput) -> Result<AdminUser, QuizError> {
        if input.user_id.trim().is_empty() {
            return Err(QuizError::validation("user_id must not be empty"));
        }
        let mut tables = self.tables.write().await;
        let (id, created_at) = tables
            .admins
            .get(&input.user_id)
            .map_or_else(|| (AdminUserId::new(), Utc::now()), |a| (a.id, a.created_at));
        let admin = AdminUser {
            id,
            user_id: input.user_id,
            can_modify_tokens: input.can_modify_tokens,
            can_modify_phases: input.can_modify_phases,
            can_view_analytics: input.can_view_analytics,
            can_manage_sessions: input.can_manage_sessions,
            created_at,
        };
        tables.admins.insert(admin.user_id.clone(), admin.clone());
        tracing::info!(user_id = %admin.user_id, "admin capabilities saved");
        Ok(admin)
    }
}
