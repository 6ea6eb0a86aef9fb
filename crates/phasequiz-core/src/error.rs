//! Error taxonomy shared by the progress engine, the configuration
//! provider, and every [`QuizStore`](crate::store::QuizStore)
//! implementation.
//!
//! Callers distinguish three cases: the input was rejected
//! ([`QuizError::Validation`]), the referenced record does not exist
//! ([`QuizError::NotFound`]), or the store itself failed
//! ([`QuizError::Storage`]). Store failures are never retried here.

/// Boxed error type carried by [`QuizError::Storage`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by core operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Malformed or out-of-range input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced session or record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),
}

impl QuizError {
    /// Build a [`QuizError::Validation`] from anything printable.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuizError::NotFound`] from anything printable.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
