//! Question bank persistence.

use chrono::Utc;
use phasequiz_core::filter::QuestionFilter;
use phasequiz_types::{Question, QuestionId, QuestionInput};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::DbError;
use crate::rows::{QUESTION_COLUMNS, QuestionRow};

/// Operations on the `questions` table.
pub struct QuestionStore<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionStore<'a> {
    /// Create a new question store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Questions matching `filter`, by phase then creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::InvalidRow`] on an unknown question type.
    pub async fn list(&self, filter: &QuestionFilter) -> Result<Vec<Question>, DbError> {
        let mut qb = filtered(filter);
        qb.push(" ORDER BY phase_number, created_at, id");
        let rows = qb.build_query_as::<QuestionRow>().fetch_all(self.pool).await?;
        rows.into_iter().map(QuestionRow::into_domain).collect()
    }

    /// Up to `count` random active questions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn random(&self, filter: &QuestionFilter, count: usize) -> Result<Vec<Question>, DbError> {
        let mut qb = filtered(&filter.clone().active());
        qb.push(" ORDER BY random() LIMIT ")
            .push_bind(i64::try_from(count).unwrap_or(i64::MAX));
        let rows = qb.build_query_as::<QuestionRow>().fetch_all(self.pool).await?;
        rows.into_iter().map(QuestionRow::into_domain).collect()
    }

    /// One question, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&self, id: QuestionId) -> Result<Option<Question>, DbError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;
        row.map(QuestionRow::into_domain).transpose()
    }

    /// Insert a new question. The caller validates `input` first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, input: &QuestionInput) -> Result<Question, DbError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "INSERT INTO questions ({QUESTION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(QuestionId::new().into_inner())
        .bind(input.phase_number)
        .bind(input.question_type.as_str())
        .bind(&input.question_text)
        .bind(&input.answer_data)
        .bind(input.difficulty)
        .bind(input.tokens_value)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        let question = row.into_domain()?;
        tracing::info!(question_id = %question.id, phase = question.phase_number, "question created");
        Ok(question)
    }

    /// Replace a question's content. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn update(&self, id: QuestionId, input: &QuestionInput) -> Result<Option<Question>, DbError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "UPDATE questions \
             SET phase_number = $2, question_type = $3, question_text = $4, answer_data = $5, \
                 difficulty = $6, tokens_value = $7, is_active = $8 \
             WHERE id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(input.phase_number)
        .bind(input.question_type.as_str())
        .bind(&input.question_text)
        .bind(&input.answer_data)
        .bind(input.difficulty)
        .bind(input.tokens_value)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await?;

        let question = row.map(QuestionRow::into_domain).transpose()?;
        if question.is_some() {
            tracing::info!(question_id = %id, "question updated");
        }
        Ok(question)
    }

    /// Delete a question. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&self, id: QuestionId) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;
        let removed = done.rows_affected() > 0;
        if removed {
            tracing::info!(question_id = %id, "question deleted");
        }
        Ok(removed)
    }
}

/// `SELECT ... WHERE` with the filter's predicates applied.
fn filtered(filter: &QuestionFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> =
        QueryBuilder::new(format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE TRUE"));
    if filter.active_only {
        qb.push(" AND is_active");
    }
    if let Some(phase) = filter.phase {
        qb.push(" AND phase_number = ").push_bind(phase);
    }
    if let Some(question_type) = filter.question_type {
        qb.push(" AND question_type = ").push_bind(question_type.as_str());
    }
    qb
}

#[cfg(test)]
mod tests {
    use phasequiz_types::QuestionType;
    use sqlx::Execute;

    use super::*;

    #[test]
    fn filter_predicates_become_where_clauses() {
        let filter = QuestionFilter {
            phase: Some(2),
            question_type: Some(QuestionType::TrueFalse),
            active_only: true,
        };
        let mut qb = filtered(&filter);
        let sql = qb.build().sql().to_owned();
        assert!(sql.contains("AND is_active"));
        assert!(sql.contains("AND phase_number = $1"));
        assert!(sql.contains("AND question_type = $2"));
    }

    #[test]
    fn empty_filter_has_no_predicates() {
        let mut qb = filtered(&QuestionFilter::default());
        let sql = qb.build().sql().to_owned();
        assert!(sql.ends_with("WHERE TRUE"));
    }
}
