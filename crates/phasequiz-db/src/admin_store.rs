//! Administrator capability persistence.

use chrono::Utc;
use phasequiz_types::{AdminUser, AdminUserId, AdminUserInput};
use sqlx::PgPool;

use crate::error::DbError;
use crate::rows::AdminRow;

const ADMIN_COLUMNS: &str = "id, user_id, can_modify_tokens, can_modify_phases, \
     can_view_analytics, can_manage_sessions, created_at";

/// Operations on the `admin_users` table.
pub struct AdminStore<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminStore<'a> {
    /// Create a new admin store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The capability set for `user_id`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&self, user_id: &str) -> Result<Option<AdminUser>, DbError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(AdminRow::into_domain))
    }

    /// Create or replace the capability set for `input.user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the write fails.
    pub async fn upsert(&self, input: &AdminUserInput) -> Result<AdminUser, DbError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "INSERT INTO admin_users ({ADMIN_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id) DO UPDATE \
             SET can_modify_tokens = EXCLUDED.can_modify_tokens, \
                 can_modify_phases = EXCLUDED.can_modify_phases, \
                 can_view_analytics = EXCLUDED.can_view_analytics, \
                 can_manage_sessions = EXCLUDED.can_manage_sessions \
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(AdminUserId::new().into_inner())
        .bind(&input.user_id)
        .bind(input.can_modify_tokens)
        .bind(input.can_modify_phases)
        .bind(input.can_view_analytics)
        .bind(input.can_manage_sessions)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(user_id = %row.user_id, "admin capabilities saved");
        Ok(row.into_domain())
    }
}
