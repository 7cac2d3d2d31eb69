//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POLLS_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`). Not needed when `POLLS_STORE=memory`.
//!
//! ## Optional
//! - `POLLS_STORE` - `postgres` (default) or `memory`
//! - `POLLS_HOST` - Bind address (default: 127.0.0.1)
//! - `POLLS_PORT` - Listen port (default: 8000)
//! - `POLLS_BASE_URL` - Public URL (default: `http://localhost:8000`)
//! - `POLLS_STATIC_DIR` - Static asset root (default: `crates/web/static`)
//! - `POLLS_LOG_FORMAT` - `text` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where poll data lives.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// `PostgreSQL` via sqlx; sessions are stored in the same database.
    Postgres {
        /// Connection URL (contains password)
        database_url: SecretString,
    },
    /// Volatile in-process store. Data and sessions vanish on restart.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct PollsConfig {
    /// Poll and session storage
    pub store: StoreBackend,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; `https://` marks cookies `Secure`
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl PollsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match get_or_default(&get, "POLLS_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: get_database_url(&get, "POLLS_DATABASE_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "POLLS_STORE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let host = get_or_default(&get, "POLLS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("POLLS_HOST".to_string(), e.to_string()))?;
        let port = get_or_default(&get, "POLLS_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("POLLS_PORT".to_string(), e.to_string()))?;

        let base_url = get_or_default(&get, "POLLS_BASE_URL", "http://localhost:8000");
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "POLLS_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }

        let log_format = match get_or_default(&get, "POLLS_LOG_FORMAT", "text").as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "POLLS_LOG_FORMAT".to_string(),
                    format!("expected 'text' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            store,
            host,
            port,
            base_url: base_url.trim_end_matches('/').to_owned(),
            static_dir: PathBuf::from(get_or_default(&get, "POLLS_STATIC_DIR", "crates/web/static")),
            log_format,
            sentry_dsn: get("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for PollsConfig {
    /// Local development defaults backed by the in-memory store.
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
            static_dir: PathBuf::from("crates/web/static"),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(get: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get(key).unwrap_or_else(|| default.to_string())
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    get: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    get(primary_key)
        .or_else(|| get("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}
