//! Poll storage.
//!
//! # Database schema: `polls`
//!
//! - `question` - Poll prompts with a publish date
//! - `choice` - Answers with a vote counter, cascade-deleted with their question
//! - `tower_sessions.session` - Session storage (owned by tower-sessions)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p polls-cli -- migrate
//! ```
//!
//! # Backends
//!
//! [`PollStore`] fronts either `PostgreSQL` or the in-memory [`MemoryStore`].
//! Both give the same guarantees: choices come back in id order and a vote is
//! a single check-and-increment that cannot lose concurrent updates.

pub mod choices;
pub mod memory;
pub mod questions;

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use polls_core::{ChoiceId, Label, QuestionId};

pub use choices::ChoiceRepository;
pub use memory::MemoryStore;
pub use questions::QuestionRepository;

use crate::models::{Choice, NewPoll, NewQuestion, Question, VoteOutcome};

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Storage backend shared by all handlers.
#[derive(Debug, Clone)]
pub enum PollStore {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl PollStore {
    /// Published questions, newest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn latest_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Question>, RepositoryError> {
        match self {
            Self::Postgres(pool) => {
                QuestionRepository::new(pool)
                    .latest_published(now, limit)
                    .await
            }
            Self::Memory(store) => Ok(store.latest_published(now, limit).await),
        }
    }

    /// A question by id, only if it is published at `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn published_question(
        &self,
        id: QuestionId,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>, RepositoryError> {
        match self {
            Self::Postgres(pool) => QuestionRepository::new(pool).get_published(id, now).await,
            Self::Memory(store) => Ok(store.get_published(id, now).await),
        }
    }

    /// A question by id regardless of publish date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn question(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        match self {
            Self::Postgres(pool) => QuestionRepository::new(pool).get(id).await,
            Self::Memory(store) => Ok(store.get(id).await),
        }
    }

    /// Every question, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn all_questions(&self) -> Result<Vec<Question>, RepositoryError> {
        match self {
            Self::Postgres(pool) => QuestionRepository::new(pool).list_all().await,
            Self::Memory(store) => Ok(store.list_all().await),
        }
    }

    /// Choices of a question in id (insertion) order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn choices(&self, question_id: QuestionId) -> Result<Vec<Choice>, RepositoryError> {
        match self {
            Self::Postgres(pool) => ChoiceRepository::new(pool).list_for_question(question_id).await,
            Self::Memory(store) => Ok(store.choices(question_id).await),
        }
    }

    /// Add one vote to `choice_id` if it belongs to `question_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written or the
    /// counter would overflow.
    pub async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> Result<VoteOutcome, RepositoryError> {
        match self {
            Self::Postgres(pool) => {
                ChoiceRepository::new(pool)
                    .record_vote(question_id, choice_id)
                    .await
            }
            Self::Memory(store) => store.record_vote(question_id, choice_id).await,
        }
    }

    /// Create a question.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub async fn create_question(&self, input: &NewQuestion) -> Result<Question, RepositoryError> {
        match self {
            Self::Postgres(pool) => QuestionRepository::new(pool).create(input).await,
            Self::Memory(store) => Ok(store.create_question(input).await),
        }
    }

    /// Add a choice with zero votes to a question.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the question does not exist.
    pub async fn add_choice(
        &self,
        question_id: QuestionId,
        choice_text: &Label,
    ) -> Result<Choice, RepositoryError> {
        match self {
            Self::Postgres(pool) => ChoiceRepository::new(pool).create(question_id, choice_text).await,
            Self::Memory(store) => store.add_choice(question_id, choice_text).await,
        }
    }

    /// Create several questions with their choices as one unit.
    ///
    /// Either every poll is stored or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any insert fails.
    pub async fn import(
        &self,
        polls: &[NewPoll],
    ) -> Result<Vec<(Question, Vec<Choice>)>, RepositoryError> {
        match self {
            Self::Postgres(pool) => QuestionRepository::new(pool).import(polls).await,
            Self::Memory(store) => Ok(store.import(polls).await),
        }
    }

    /// Delete a question and its choices. Returns false if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub async fn delete_question(&self, id: QuestionId) -> Result<bool, RepositoryError> {
        match self {
            Self::Postgres(pool) => QuestionRepository::new(pool).delete(id).await,
            Self::Memory(store) => Ok(store.delete_question(id).await),
        }
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if `PostgreSQL` does not answer.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Self::Memory(_) => Ok(()),
        }
    }
}

impl From<MemoryStore> for PollStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgPool> for PollStore {
    fn from(pool: PgPool) -> Self {
        Self::Postgres(pool)
    }
}
