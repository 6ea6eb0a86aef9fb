//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors. Conversion into [`QuizError`] happens at the
//! [`QuizStore`](phasequiz_core::QuizStore) boundary: domain errors pass
//! through untouched, everything else becomes [`QuizError::Storage`].

use phasequiz_core::QuizError;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped onto the domain model.
    #[error("invalid row in {table}: {reason}")]
    InvalidRow {
        /// The table the row came from.
        table: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The domain logic rejected the operation.
    #[error(transparent)]
    Domain(#[from] QuizError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbError> for QuizError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(inner) => inner,
            other => Self::Storage(Box::new(other)),
        }
    }
}
