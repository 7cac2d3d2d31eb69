//! HTTP route handlers for the polls site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Latest published questions
//! GET  /{question_id}/           - Voting form
//! GET  /{question_id}/results/   - Vote counts
//! POST /{question_id}/vote/      - Record a vote (303 to results)
//! ```
//!
//! Health checks and static files are mounted by [`crate::app`].

pub mod polls;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the polls router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(polls::index))
        .route("/{question_id}/", get(polls::detail))
        .route("/{question_id}/results/", get(polls::results))
        .route("/{question_id}/vote/", post(polls::vote))
}
