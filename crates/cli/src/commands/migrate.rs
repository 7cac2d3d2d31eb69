//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! polls migrate
//! ```
//!
//! Applies `crates/web/migrations/` (the `polls` schema) and creates the
//! session table used by `tower-sessions-sqlx-store`. Both steps are
//! idempotent.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running polls migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Running session store migrations...");
    PostgresStore::new(pool)
        .migrate()
        .await
        .map_err(|e| CliError::SessionStore(e.to_string()))?;

    tracing::info!("Migrations complete!");
    Ok(())
}
