//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the anti-forgery token echoed in every form.
    pub const CSRF_TOKEN: &str = "csrf_token";
}
