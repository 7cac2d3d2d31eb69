//! CLI command implementations.

pub mod migrate;
pub mod poll;
pub mod seed;

use polls_web::config::{ConfigError, PollsConfig, StoreBackend};
use polls_web::db::{self, PollStore, RepositoryError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configured store is not `PostgreSQL`.
    #[error("POLLS_STORE=memory has nothing to manage; point the CLI at PostgreSQL")]
    MemoryStore,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Session table migration failed.
    #[error("Session store migration error: {0}")]
    SessionStore(String),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid argument.
    #[error("Invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },

    /// Referenced question does not exist.
    #[error("Question {0} not found")]
    QuestionNotFound(String),

    /// Seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Seed file is not valid YAML for the expected shape.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Connect to the configured `PostgreSQL` database.
async fn connect() -> Result<sqlx::PgPool, CliError> {
    let config = PollsConfig::from_env()?;
    let StoreBackend::Postgres { database_url } = &config.store else {
        return Err(CliError::MemoryStore);
    };

    tracing::info!("Connecting to polls database...");
    Ok(db::create_pool(database_url).await?)
}

/// Connect and wrap the pool in a [`PollStore`].
async fn store() -> Result<PollStore, CliError> {
    Ok(PollStore::from(connect().await?))
}
