//! Anti-forgery tokens for state-changing forms.
//!
//! Each session gets one random token (128-bit, base64) the first time a form
//! is rendered. Forms echo it in the hidden `csrfmiddlewaretoken` field and
//! POST handlers compare it against the session copy before doing anything
//! else.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Name of the hidden form field carrying the token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// The session's anti-forgery token, ready to embed in a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a new random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the token value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Compare against a submitted value without short-circuiting.
    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), submitted.as_bytes())
    }

    /// Return the session's token, creating and storing one if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn for_session(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        if let Some(existing) = session.get::<String>(session_keys::CSRF_TOKEN).await? {
            return Ok(Self(existing));
        }

        let token = Self::generate();
        session.insert(session_keys::CSRF_TOKEN, &token.0).await?;
        Ok(token)
    }
}

/// Extractor yielding the current session's token.
///
/// # Example
///
/// ```rust,ignore
/// async fn form(csrf: CsrfToken) -> impl IntoResponse {
///     FormTemplate { csrf_token: csrf.value().to_owned() }
/// }
/// ```
impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            AppError::Internal("session layer missing from middleware stack".to_string())
        })?;

        Ok(Self::for_session(session).await?)
    }
}

/// Check a submitted token against the session.
///
/// A session without a token never validates: the form that would carry a
/// matching value was not rendered for it.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the token is missing or wrong, or
/// `AppError::Session` if the session cannot be read.
pub async fn verify_csrf_token(session: &Session, submitted: Option<&str>) -> Result<(), AppError> {
    let Some(submitted) = submitted.filter(|s| !s.is_empty()) else {
        tracing::warn!("Rejected form post without anti-forgery token");
        return Err(AppError::Forbidden("missing anti-forgery token".to_string()));
    };

    let stored = session
        .get::<String>(session_keys::CSRF_TOKEN)
        .await?
        .map(CsrfToken);

    match stored {
        Some(token) if token.matches(submitted) => Ok(()),
        _ => {
            tracing::warn!("Rejected form post with invalid anti-forgery token");
            Err(AppError::Forbidden("invalid anti-forgery token".to_string()))
        }
    }
}

/// Equal-length inputs take the same time whatever their contents.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_generated_tokens_differ() {
        let a = CsrfToken::generate();
        let b = CsrfToken::generate();
        assert_ne!(a, b);
        // 16 bytes -> 22 base64 chars without padding
        assert_eq!(a.value().len(), 22);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[tokio::test]
    async fn test_for_session_is_stable() {
        let session = session();
        let first = CsrfToken::for_session(&session).await.unwrap();
        let second = CsrfToken::for_session(&session).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_verify_accepts_issued_token() {
        let session = session();
        let token = CsrfToken::for_session(&session).await.unwrap();
        assert!(verify_csrf_token(&session, Some(token.value())).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_rejects_missing_and_wrong_tokens() {
        let session = session();
        let _ = CsrfToken::for_session(&session).await.unwrap();

        let missing = verify_csrf_token(&session, None).await.unwrap_err();
        assert!(matches!(missing, AppError::Forbidden(_)));

        let empty = verify_csrf_token(&session, Some("")).await.unwrap_err();
        assert!(matches!(empty, AppError::Forbidden(_)));

        let wrong = verify_csrf_token(&session, Some("not-the-token"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_verify_rejects_session_without_token() {
        let session = session();
        let forged = CsrfToken::generate();
        let err = verify_csrf_token(&session, Some(forged.value()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
