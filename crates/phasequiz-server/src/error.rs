//! Error types for the server binary.
//!
//! [`StartupError`] wraps every failure mode between reading the
//! configuration and the HTTP server returning.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: phasequiz_core::config::ConfigError,
    },

    /// The database could not be reached or migrated.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: phasequiz_db::DbError,
    },

    /// Seeding the default configuration failed.
    #[error("seed error: {source}")]
    Seed {
        /// The underlying store error.
        #[from]
        source: phasequiz_core::QuizError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: phasequiz_api::ServerError,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
