//! Persistence abstraction.
//!
//! [`QuizStore`] is the seam between the domain logic and whatever holds
//! the records. Implementations must make [`QuizStore::complete_phase`]
//! atomic: the upsert of the result, the token recomputation, and the
//! session save either all happen or none do, and concurrent calls on
//! the same session are serialized.
//!
//! Operations that only combine other store calls (bulk updates, seeding,
//! analytics) are free functions generic over the store.

use std::future::Future;

use chrono::{DateTime, Utc};
use phasequiz_types::{
    AdminUser, AdminUserInput, AnalyticsSummary, BulkUpdateOutcome, GameSession, PhaseCompletion,
    PhaseConfigInput, PhaseConfiguration, PhaseResult, Question, QuestionId, QuestionInput,
    RejectedTokenConfig, SessionId, SessionProgress, SessionRecord, TokenConfigInput,
    TokenConfiguration,
};

use crate::analytics::{AnalyticsOptions, compute_analytics_with};
use crate::error::QuizError;
use crate::filter::{PhaseResultFilter, QuestionFilter, SessionFilter};
use crate::phase_config::default_phase_configs;
use crate::token_config::default_token_configs;

/// Storage operations required by the game and admin surfaces.
pub trait QuizStore: Send + Sync + 'static {
    /// Start a new session.
    fn create_session(
        &self,
        team_name: &str,
    ) -> impl Future<Output = Result<GameSession, QuizError>> + Send;

    /// A session with all its phase results.
    fn get_session(
        &self,
        id: SessionId,
    ) -> impl Future<Output = Result<SessionRecord, QuizError>> + Send;

    /// Sessions matching `filter`, newest first.
    fn list_sessions(
        &self,
        filter: &SessionFilter,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, QuizError>> + Send;

    /// Delete a session and its results.
    fn delete_session(&self, id: SessionId)
    -> impl Future<Output = Result<(), QuizError>> + Send;

    /// Record a phase completion atomically.
    fn complete_phase(
        &self,
        id: SessionId,
        completion: PhaseCompletion,
    ) -> impl Future<Output = Result<SessionProgress, QuizError>> + Send;

    /// Mark a session's game finished.
    fn complete_game(
        &self,
        id: SessionId,
    ) -> impl Future<Output = Result<GameSession, QuizError>> + Send;

    /// Phase results matching `filter`, by session then phase.
    fn list_phase_results(
        &self,
        filter: &PhaseResultFilter,
    ) -> impl Future<Output = Result<Vec<PhaseResult>, QuizError>> + Send;

    /// All token configurations in phase order.
    fn list_token_configs(
        &self,
    ) -> impl Future<Output = Result<Vec<TokenConfiguration>, QuizError>> + Send;

    /// Create or update the token configuration for `input.phase_number`.
    fn upsert_token_config(
        &self,
        input: TokenConfigInput,
    ) -> impl Future<Output = Result<TokenConfiguration, QuizError>> + Send;

    /// All phase configurations in phase order.
    fn list_phase_configs(
        &self,
    ) -> impl Future<Output = Result<Vec<PhaseConfiguration>, QuizError>> + Send;

    /// Create or update the phase configuration for `input.phase_number`.
    fn upsert_phase_config(
        &self,
        input: PhaseConfigInput,
    ) -> impl Future<Output = Result<PhaseConfiguration, QuizError>> + Send;

    /// Questions matching `filter`, by phase then creation.
    fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> impl Future<Output = Result<Vec<Question>, QuizError>> + Send;

    /// One question.
    fn get_question(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<Question, QuizError>> + Send;

    /// Add a question to the bank.
    fn create_question(
        &self,
        input: QuestionInput,
    ) -> impl Future<Output = Result<Question, QuizError>> + Send;

    /// Replace a question's content.
    fn update_question(
        &self,
        id: QuestionId,
        input: QuestionInput,
    ) -> impl Future<Output = Result<Question, QuizError>> + Send;

    /// Remove a question from the bank.
    fn delete_question(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<(), QuizError>> + Send;

    /// Up to `count` random active questions matching `filter`.
    fn random_questions(
        &self,
        filter: &QuestionFilter,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Question>, QuizError>> + Send;

    /// The capability set for an authentication identity.
    fn get_admin(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<AdminUser, QuizError>> + Send;

    /// Create or replace the capability set for `input.user_id`.
    fn upsert_admin(
        &self,
        input: AdminUserInput,
    ) -> impl Future<Output = Result<AdminUser, QuizError>> + Send;
}

/// Apply a batch of token configuration writes.
///
/// Each item is validated and written on its own. Items failing
/// validation are reported in `rejected` and do not stop the rest.
///
/// # Errors
///
/// Store failures abort the batch; items already written stay written.
pub async fn bulk_update_token_configs<S: QuizStore>(
    store: &S,
    items: Vec<TokenConfigInput>,
) -> Result<BulkUpdateOutcome, QuizError> {
    let mut outcome = BulkUpdateOutcome::default();
    for item in items {
        let phase_number = item.phase_number;
        match store.upsert_token_config(item).await {
            Ok(config) => outcome.updated.push(config),
            Err(QuizError::Validation(error)) => {
                outcome.rejected.push(RejectedTokenConfig {
                    phase_number,
                    error,
                });
            }
            Err(other) => return Err(other),
        }
    }
    tracing::info!(
        updated = outcome.updated.len(),
        rejected = outcome.rejected.len(),
        "bulk token configuration update applied"
    );
    Ok(outcome)
}

/// How many default records [`seed_defaults`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Token configurations inserted.
    pub token_configs: usize,
    /// Phase configurations inserted.
    pub phase_configs: usize,
}

/// Write the default token and phase configurations for phases that
/// have none. Existing records are left untouched, so this is safe to
/// run on every start.
///
/// # Errors
///
/// Propagates store failures.
pub async fn seed_defaults<S: QuizStore>(store: &S) -> Result<SeedReport, QuizError> {
    let mut report = SeedReport::default();

    let existing = store.list_token_configs().await?;
    for input in default_token_configs() {
        if existing.iter().all(|c| c.phase_number != input.phase_number) {
            store.upsert_token_config(input).await?;
            report.token_configs = report.token_configs.saturating_add(1);
        }
    }

    let existing = store.list_phase_configs().await?;
    for input in default_phase_configs() {
        if existing.iter().all(|c| c.phase_number != input.phase_number) {
            store.upsert_phase_config(input).await?;
            report.phase_configs = report.phase_configs.saturating_add(1);
        }
    }

    tracing::info!(
        token_configs = report.token_configs,
        phase_configs = report.phase_configs,
        "default configuration seeded"
    );
    Ok(report)
}

/// Load every session and compute the dashboard summary.
///
/// # Errors
///
/// Propagates store failures.
pub async fn analytics<S: QuizStore>(
    store: &S,
    now: DateTime<Utc>,
    options: AnalyticsOptions,
) -> Result<AnalyticsSummary, QuizError> {
    let records = store.list_sessions(&SessionFilter::default()).await?;
    Ok(compute_analytics_with(&records, now, options))
}
