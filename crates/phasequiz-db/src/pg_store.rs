//! [`QuizStore`] implementation over `PostgreSQL`.
//!
//! Validation runs here, before any SQL is issued, using the same core
//! rules as the in-memory store. Missing rows become
//! [`QuizError::NotFound`]; database failures become
//! [`QuizError::Storage`].

use chrono::Utc;
use phasequiz_core::filter::{PhaseResultFilter, QuestionFilter, SessionFilter};
use phasequiz_core::phase_config::validate_phase_config;
use phasequiz_core::progress;
use phasequiz_core::questions::validate_question;
use phasequiz_core::token_config::validate_token_config;
use phasequiz_core::{QuizError, QuizStore};
use phasequiz_types::{
    AdminUser, AdminUserInput, GameSession, PhaseCompletion, PhaseConfigInput,
    PhaseConfiguration, PhaseResult, Question, QuestionId, QuestionInput, SessionId,
    SessionProgress, SessionRecord, TokenConfigInput, TokenConfiguration,
};

use crate::admin_store::AdminStore;
use crate::config_store::ConfigStore;
use crate::postgres::PostgresPool;
use crate::question_store::QuestionStore;
use crate::session_store::SessionStore;

/// A [`QuizStore`] persisted in `PostgreSQL`.
#[derive(Clone)]
pub struct PgQuizStore {
    db: PostgresPool,
}

impl PgQuizStore {
    /// Wrap a connected pool.
    pub const fn new(db: PostgresPool) -> Self {
        Self { db }
    }

    /// The underlying pool handle.
    pub const fn db(&self) -> &PostgresPool {
        &self.db
    }

    fn sessions(&self) -> SessionStore<'_> {
        SessionStore::new(self.db.pool())
    }

    fn configs(&self) -> ConfigStore<'_> {
        ConfigStore::new(self.db.pool())
    }

    fn questions(&self) -> QuestionStore<'_> {
        QuestionStore::new(self.db.pool())
    }

    fn admins(&self) -> AdminStore<'_> {
        AdminStore::new(self.db.pool())
    }
}

fn session_not_found(id: SessionId) -> QuizError {
    QuizError::not_found(format!("session {id}"))
}

fn question_not_found(id: QuestionId) -> QuizError {
    QuizError::not_found(format!("question {id}"))
}

impl QuizStore for PgQuizStore {
    async fn create_session(&self, team_name: &str) -> Result<GameSession, QuizError> {
        let session = progress::start_session(team_name, Utc::now())?;
        self.sessions().insert(&session).await?;
        Ok(session)
    }

    async fn get_session(&self, id: SessionId) -> Result<SessionRecord, QuizError> {
        self.sessions().get(id).await?.ok_or_else(|| session_not_found(id))
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>, QuizError> {
        Ok(self.sessions().list(filter).await?)
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), QuizError> {
        if self.sessions().delete(id).await? {
            Ok(())
        } else {
            Err(session_not_found(id))
        }
    }

    async fn complete_phase(
        &self,
        id: SessionId,
        completion: PhaseCompletion,
    ) -> Result<SessionProgress, QuizError> {
        self.sessions()
            .complete_phase(id, completion)
            .await?
            .ok_or_else(|| session_not_found(id))
    }

    async fn complete_game(&self, id: SessionId) -> Result<GameSession, QuizError> {
        self.sessions().complete_game(id).await?.ok_or_else(|| session_not_found(id))
    }

    async fn list_phase_results(
        &self,
        filter: &PhaseResultFilter,
    ) -> Result<Vec<PhaseResult>, QuizError> {
        Ok(self.sessions().list_results(filter).await?)
    }

    async fn list_token_configs(&self) -> Result<Vec<TokenConfiguration>, QuizError> {
        Ok(self.configs().token_configs().await?)
    }

    async fn upsert_token_config(
        &self,
        input: TokenConfigInput,
    ) -> Result<TokenConfiguration, QuizError> {
        validate_token_config(&input)?;
        Ok(self.configs().upsert_token_config(&input).await?)
    }

    async fn list_phase_configs(&self) -> Result<Vec<PhaseConfiguration>, QuizError> {
        Ok(self.configs().phase_configs().await?)
    }

    async fn upsert_phase_config(
        &self,
        input: PhaseConfigInput,
    ) -> Result<PhaseConfiguration, QuizError> {
        validate_phase_config(&input)?;
        Ok(self.configs().upsert_phase_config(&input).await?)
    }

    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, QuizError> {
        Ok(self.questions().list(filter).await?)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Question, QuizError> {
        self.questions().get(id).await?.ok_or_else(|| question_not_found(id))
    }

    async fn create_question(&self, input: QuestionInput) -> Result<Question, QuizError> {
        validate_question(&input)?;
        Ok(self.questions().insert(&input).await?)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        input: QuestionInput,
    ) -> Result<Question, QuizError> {
        validate_question(&input)?;
        self.questions().update(id, &input).await?.ok_or_else(|| question_not_found(id))
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), QuizError> {
        if self.questions().delete(id).await? {
            Ok(())
        } else {
            Err(question_not_found(id))
        }
    }

    async fn random_questions(
        &self,
        filter: &QuestionFilter,
        count: usize,
    ) -> Result<Vec<Question>, QuizError> {
        Ok(self.questions().random(filter, count).await?)
    }

    async fn get_admin(&self, user_id: &str) -> Result<AdminUser, QuizError> {
        self.admins()
            .get(user_id)
            .await?
            .ok_or_else(|| QuizError::not_found(format!("admin user {user_id}")))
    }

    async fn upsert_admin(&self, input: AdminUserInput) -> Result<AdminUser, QuizError> {
        if input.user_id.trim().is_empty() {
            return Err(QuizError::validation("user_id must not be empty"));
        }
        Ok(self.admins().upsert(&input).await?)
    }
}
