//! Server binary for the Phase Quiz backend.
//!
//! This is the main entry point that wires together configuration,
//! logging, the selected store and the HTTP API. It runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `phasequiz-config.yaml` (or the path in
//!    `PHASEQUIZ_CONFIG`), applying environment overrides
//! 2. Initialize structured logging (tracing)
//! 3. Open the configured store (`PostgreSQL` with migrations, or memory)
//! 4. Seed default token and phase configuration when enabled
//! 5. Serve the HTTP API
//! 6. Close the database pool on shutdown

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use phasequiz_api::{AppState, ServerConfig};
use phasequiz_core::config::{AppConfig, LogFormat, LoggingConfig, StorageBackend};
use phasequiz_core::store::seed_defaults;
use phasequiz_core::{MemoryStore, QuizStore};
use phasequiz_db::{PgQuizStore, PostgresConfig, PostgresPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "phasequiz-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the server fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = config_path();
    let (config, from_file) = load_config(&config_path).context("loading configuration")?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging)?;
    info!("phasequiz-server starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        backend = ?config.storage.backend,
        host = config.server.host,
        port = config.server.port,
        seed_defaults = config.storage.seed_defaults,
        "Runtime settings"
    );

    // 3. Open the store and serve.
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = PostgresPool::connect(&PostgresConfig::from(&config.database))
                .await
                .map_err(StartupError::from)
                .context("connecting to PostgreSQL")?;
            if config.database.run_migrations {
                pool.run_migrations()
                    .await
                    .map_err(StartupError::from)
                    .context("running migrations")?;
            }
            let result = serve(PgQuizStore::new(pool.clone()), &config).await;
            pool.close().await;
            result?;
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store, data is lost on restart");
            serve(MemoryStore::new(), &config).await?;
        }
    }

    info!("phasequiz-server shutdown complete");
    Ok(())
}

/// Seed if configured, then run the HTTP API over `store` until shutdown.
async fn serve<S: QuizStore>(store: S, config: &AppConfig) -> Result<(), StartupError> {
    // 4. Seed defaults.
    if config.storage.seed_defaults {
        let report = seed_defaults(&store).await?;
        info!(
            token_configs = report.token_configs,
            phase_configs = report.phase_configs,
            "Default configuration ensured"
        );
    }

    // 5. Serve the API.
    let state = Arc::new(AppState::with_game(store, config.game.clone()));
    phasequiz_api::start_server(&ServerConfig::from(&config.server), state).await?;
    Ok(())
}

/// The configuration path: `PHASEQUIZ_CONFIG` when set, otherwise
/// [`DEFAULT_CONFIG_PATH`].
fn config_path() -> PathBuf {
    std::env::var_os("PHASEQUIZ_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults (with
/// environment overrides still applied) when the file does not exist.
///
/// The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(AppConfig, bool), StartupError> {
    if path.exists() {
        Ok((AppConfig::from_file(path)?, true))
    } else {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        Ok((config, false))
    }
}

/// Build the log filter: `RUST_LOG` when set and valid, otherwise the
/// configured level, otherwise `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber.
fn init_tracing(logging: &LoggingConfig) -> Result<(), StartupError> {
    let filter = env_filter(&logging.level);
    let result = match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };
    result.map_err(|e| StartupError::Logging {
        message: e.to_string(),
    })
}
