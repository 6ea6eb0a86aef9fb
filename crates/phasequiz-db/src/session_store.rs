//! Session and phase result persistence.
//!
//! Phase completion runs inside one transaction that locks the session
//! row with `SELECT ... FOR UPDATE`, so concurrent completions for the
//! same session are serialized and the stored total always equals the
//! sum of the stored results.

use std::collections::HashMap;

use chrono::Utc;
use phasequiz_core::filter::{PhaseResultFilter, SessionFilter};
use phasequiz_core::progress;
use phasequiz_types::{
    GameSession, PhaseCompletion, PhaseResult, SessionId, SessionProgress, SessionRecord,
};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::DbError;
use crate::rows::{PHASE_RESULT_COLUMNS, PhaseResultRow, SESSION_COLUMNS, SessionRow};

/// Operations on the `game_sessions` and `phase_results` tables.
pub struct SessionStore<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionStore<'a> {
    /// Create a new session store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, session: &GameSession) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO game_sessions (id, team_name, total_tokens, current_phase, completed, created_at, updated_at, completed_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(session.id.into_inner())
        .bind(&session.team_name)
        .bind(session.total_tokens)
        .bind(session.current_phase)
        .bind(session.completed)
        .bind(session.created_at)
        .bind(session.updated_at)
        .bind(session.completed_at)
        .execute(self.pool)
        .await?;

        tracing::info!(session_id = %session.id, team = %session.team_name, "session created");
        Ok(())
    }

    /// Load a session with its results, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a query fails.
    pub async fn get(&self, id: SessionId) -> Result<Option<SessionRecord>, DbError> {
        let mut conn = self.pool.acquire().await?;
        load_record(&mut conn, id.into_inner(), false).await
    }

    /// Sessions matching `filter` with their results, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a query fails.
    pub async fn list(&self, filter: &SessionFilter) -> Result<Vec<SessionRecord>, DbError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {SESSION_COLUMNS} FROM game_sessions WHERE TRUE"));
        if let Some(completed) = filter.completed {
            qb.push(" AND completed = ").push_bind(completed);
        }
        if let Some(phase) = filter.phase {
            qb.push(" AND current_phase = ").push_bind(phase);
        }
        if let Some(from) = filter.date_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND created_at <= ").push_bind(to);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let sessions = qb.build_query_as::<SessionRow>().fetch_all(self.pool).await?;
        if sessions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let results = sqlx::query_as::<_, PhaseResultRow>(&format!(
            "SELECT {PHASE_RESULT_COLUMNS} FROM phase_results \
             WHERE session_id = ANY($1) ORDER BY session_id, phase_number"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_session: HashMap<Uuid, Vec<PhaseResult>> = HashMap::new();
        for row in results {
            by_session.entry(row.session_id).or_default().push(row.into_domain());
        }

        Ok(sessions
            .into_iter()
            .map(|row| {
                let phase_results = by_session.remove(&row.id).unwrap_or_default();
                SessionRecord {
                    session: row.into_domain(),
                    phase_results,
                }
            })
            .collect())
    }

    /// Delete a session; its results go with it. Returns whether a row
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&self, id: SessionId) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM game_sessions WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;
        let removed = done.rows_affected() > 0;
        if removed {
            tracing::info!(session_id = %id, "session deleted");
        }
        Ok(removed)
    }

    /// Record a phase completion in one transaction.
    ///
    /// Returns `None` if the session does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Domain`] if the completion is invalid and
    /// [`DbError::Postgres`] if a query fails. Nothing is written in
    /// either case.
    pub async fn complete_phase(
        &self,
        id: SessionId,
        completion: PhaseCompletion,
    ) -> Result<Option<SessionProgress>, DbError> {
        progress::validate_phase_number(completion.phase_number)?;

        let mut tx = self.pool.begin().await?;
        let Some(mut record) = load_record(&mut tx, id.into_inner(), true).await? else {
            return Ok(None);
        };

        let outcome = progress::complete_phase(&mut record, completion, Utc::now())?;
        let result = &outcome.phase_result;

        // completed_at is left out of the update list so overwrites keep
        // the first completion time.
        sqlx::query(
            r"INSERT INTO phase_results (id, session_id, phase_number, tokens_earned, time_spent, answers_data, completed_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              ON CONFLICT (session_id, phase_number) DO UPDATE
              SET tokens_earned = EXCLUDED.tokens_earned,
                  time_spent = EXCLUDED.time_spent,
                  answers_data = EXCLUDED.answers_data",
        )
        .bind(result.id.into_inner())
        .bind(result.session_id.into_inner())
        .bind(result.phase_number)
        .bind(result.tokens_earned)
        .bind(result.time_spent)
        .bind(&result.answers_data)
        .bind(result.completed_at)
        .execute(&mut *tx)
        .await?;

        let session = &outcome.session;
        sqlx::query(
            r"UPDATE game_sessions
              SET total_tokens = $2, current_phase = $3, updated_at = $4
              WHERE id = $1",
        )
        .bind(session.id.into_inner())
        .bind(session.total_tokens)
        .bind(session.current_phase)
        .bind(session.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            session_id = %id,
            phase = result.phase_number,
            tokens_total = session.total_tokens,
            current_phase = session.current_phase,
            created = outcome.created,
            "phase completed"
        );
        Ok(Some(outcome))
    }

    /// Mark a session's game finished. Returns `None` if the session does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn complete_game(&self, id: SessionId) -> Result<Option<GameSession>, DbError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "UPDATE game_sessions SET completed = TRUE, completed_at = $2, updated_at = $2 \
             WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        let session = row.map(SessionRow::into_domain);
        if let Some(s) = &session {
            tracing::info!(session_id = %id, tokens_total = s.total_tokens, "game completed");
        }
        Ok(session)
    }

    /// Phase results matching `filter`, by session then phase.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_results(&self, filter: &PhaseResultFilter) -> Result<Vec<PhaseResult>, DbError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PHASE_RESULT_COLUMNS} FROM phase_results WHERE TRUE"));
        if let Some(session) = filter.session {
            qb.push(" AND session_id = ").push_bind(session.into_inner());
        }
        if let Some(phase) = filter.phase {
            qb.push(" AND phase_number = ").push_bind(phase);
        }
        qb.push(" ORDER BY session_id, phase_number");

        let rows = qb.build_query_as::<PhaseResultRow>().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(PhaseResultRow::into_domain).collect())
    }
}

/// Load one session and its results on `conn`, optionally locking the
/// session row for the rest of the transaction.
async fn load_record(
    conn: &mut PgConnection,
    id: Uuid,
    for_update: bool,
) -> Result<Option<SessionRecord>, DbError> {
    let lock = if for_update { " FOR UPDATE" } else { "" };
    let row = sqlx::query_as::<_, SessionRow>(&format!(
        "SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = $1{lock}"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let results = sqlx::query_as::<_, PhaseResultRow>(&format!(
        "SELECT {PHASE_RESULT_COLUMNS} FROM phase_results WHERE session_id = $1 ORDER BY phase_number"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(SessionRecord {
        session: row.into_domain(),
        phase_results: results.into_iter().map(PhaseResultRow::into_domain).collect(),
    }))
}
