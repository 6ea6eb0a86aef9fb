//! Token and phase configuration persistence.
//!
//! Both tables are keyed by `phase_number`; writes are upserts on that
//! column, so a record's ID and phase never change after creation.

use chrono::Utc;
use phasequiz_types::{
    PhaseConfigId, PhaseConfigInput, PhaseConfiguration, TokenConfigId, TokenConfigInput,
    TokenConfiguration,
};
use sqlx::PgPool;

use crate::error::DbError;
use crate::rows::{PhaseConfigRow, TokenConfigRow};

/// Operations on `token_configurations` and `phase_configurations`.
pub struct ConfigStore<'a> {
    pool: &'a PgPool,
}

impl<'a> ConfigStore<'a> {
    /// Create a new configuration store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All token configurations in phase order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn token_configs(&self) -> Result<Vec<TokenConfiguration>, DbError> {
        let rows = sqlx::query_as::<_, TokenConfigRow>(
            r"SELECT id, phase_number, min_tokens, max_tokens, config_data, is_active, updated_at
              FROM token_configurations
              ORDER BY phase_number",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(TokenConfigRow::into_domain).collect())
    }

    /// Insert or update the token configuration for one phase.
    ///
    /// The caller validates `input` first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the write fails.
    pub async fn upsert_token_config(
        &self,
        input: &TokenConfigInput,
    ) -> Result<TokenConfiguration, DbError> {
        let row = sqlx::query_as::<_, TokenConfigRow>(
            r"INSERT INTO token_configurations (id, phase_number, min_tokens, max_tokens, config_data, is_active, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              ON CONFLICT (phase_number) DO UPDATE
              SET min_tokens = EXCLUDED.min_tokens,
                  max_tokens = EXCLUDED.max_tokens,
                  config_data = EXCLUDED.config_data,
                  is_active = EXCLUDED.is_active,
                  updated_at = EXCLUDED.updated_at
              RETURNING id, phase_number, min_tokens, max_tokens, config_data, is_active, updated_at",
        )
        .bind(TokenConfigId::new().into_inner())
        .bind(input.phase_number)
        .bind(input.min_tokens)
        .bind(input.max_tokens)
        .bind(&input.config_data)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(
            phase = row.phase_number,
            min_tokens = row.min_tokens,
            max_tokens = row.max_tokens,
            "token configuration saved"
        );
        Ok(row.into_domain())
    }

    /// All phase configurations in phase order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn phase_configs(&self) -> Result<Vec<PhaseConfiguration>, DbError> {
        let rows = sqlx::query_as::<_, PhaseConfigRow>(
            r"SELECT id, phase_number, name, description, time_limit, is_enabled, config_data
              FROM phase_configurations
              ORDER BY phase_number",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(PhaseConfigRow::into_domain).collect())
    }

    /// Insert or update the phase configuration for one phase.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the write fails.
    pub async fn upsert_phase_config(
        &self,
        input: &PhaseConfigInput,
    ) -> Result<PhaseConfiguration, DbError> {
        let row = sqlx::query_as::<_, PhaseConfigRow>(
            r"INSERT INTO phase_configurations (id, phase_number, name, description, time_limit, is_enabled, config_data)
              VALUES ($1, $2, $3, $4, $5, $6, $7)
              ON CONFLICT (phase_number) DO UPDATE
              SET name = EXCLUDED.name,
                  description = EXCLUDED.description,
                  time_limit = EXCLUDED.time_limit,
                  is_enabled = EXCLUDED.is_enabled,
                  config_data = EXCLUDED.config_data
              RETURNING id, phase_number, name, description, time_limit, is_enabled, config_data",
        )
        .bind(PhaseConfigId::new().into_inner())
        .bind(input.phase_number)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.time_limit)
        .bind(input.is_enabled)
        .bind(&input.config_data)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(phase = row.phase_number, enabled = row.is_enabled, "phase configuration saved");
        Ok(row.into_domain())
    }
}
