//! Session middleware configuration.
//!
//! Sessions exist only to carry the anti-forgery token. `PostgreSQL` deployments
//! use `tower-sessions-sqlx-store`; the in-memory backend uses tower-sessions'
//! own `MemoryStore`.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::PollsConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "polls_session";

/// Session expiry time in seconds (14 days).
const SESSION_EXPIRY_SECONDS: i64 = 14 * 24 * 60 * 60;

/// Create the session layer around any session store.
///
/// The cookie is `Secure` when the configured base URL is https.
#[must_use]
pub fn create_session_layer<S: SessionStore>(
    store: S,
    config: &PollsConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
