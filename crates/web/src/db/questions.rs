//! Question repository for `PostgreSQL`.
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use polls_core::QuestionId;

use super::RepositoryError;
use super::choices::insert_choice;
use crate::models::{Choice, NewPoll, NewQuestion, Question};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: i32,
    question_text: String,
    pub_date: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: QuestionId::new(row.id),
            question_text: row.question_text,
            pub_date: row.pub_date,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for question database operations.
pub struct QuestionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuestionRepository<'a> {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Questions published at or before `now`, newest first.
    ///
    /// Ties on `pub_date` fall back to the newest id so the slice is stable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Question>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, QuestionRow>(
            r"
            SELECT id, question_text, pub_date
            FROM polls.question
            WHERE pub_date <= $1
            ORDER BY pub_date DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    /// Get a question by id if it is published at `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_published(
        &self,
        id: QuestionId,
        now: DateTime<Utc>,
    ) -> Result<Option<Question>, RepositoryError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r"
            SELECT id, question_text, pub_date
            FROM polls.question
            WHERE id = $1 AND pub_date <= $2
            ",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Question::from))
    }

    /// Get a question by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: QuestionId) -> Result<Option<Question>, RepositoryError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r"
            SELECT id, question_text, pub_date
            FROM polls.question
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Question::from))
    }

    /// List every question, newest first, including unpublished ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Question>, RepositoryError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r"
            SELECT id, question_text, pub_date
            FROM polls.question
            ORDER BY pub_date DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    /// Create a question.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewQuestion) -> Result<Question, RepositoryError> {
        insert_question(self.pool, input).await
    }

    /// Create questions and their choices in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// kept in that case.
    pub async fn import(
        &self,
        polls: &[NewPoll],
    ) -> Result<Vec<(Question, Vec<Choice>)>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(polls.len());

        for poll in polls {
            let question = insert_question(&mut *tx, &poll.question).await?;
            let mut added = Vec::with_capacity(poll.choices.len());
            for text in &poll.choices {
                added.push(insert_choice(&mut *tx, question.id, text).await?);
            }
            created.push((question, added));
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Delete a question. Its choices go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `false` if no question had that id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: QuestionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM polls.question WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(super) async fn insert_question<'e, E>(
    executor: E,
    input: &NewQuestion,
) -> Result<Question, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, QuestionRow>(
        r"
        INSERT INTO polls.question (question_text, pub_date)
        VALUES ($1, $2)
        RETURNING id, question_text, pub_date
        ",
    )
    .bind(input.question_text.as_str())
    .bind(input.pub_date)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}
