//! Choice repository for `PostgreSQL`.

use sqlx::{PgExecutor, PgPool};

use polls_core::{ChoiceId, Label, QuestionId};

use super::RepositoryError;
use crate::models::{Choice, VoteOutcome};

#[derive(Debug, sqlx::FromRow)]
struct ChoiceRow {
    id: i32,
    question_id: i32,
    choice_text: String,
    votes: i32,
}

impl TryFrom<ChoiceRow> for Choice {
    type Error = RepositoryError;

    fn try_from(row: ChoiceRow) -> Result<Self, Self::Error> {
        if row.votes < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "choice {} has negative vote count {}",
                row.id, row.votes
            )));
        }

        Ok(Self {
            id: ChoiceId::new(row.id),
            question_id: QuestionId::new(row.question_id),
            choice_text: row.choice_text,
            votes: row.votes,
        })
    }
}

/// Repository for choice database operations.
pub struct ChoiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ChoiceRepository<'a> {
    /// Create a new choice repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Choices of a question, ordered by id (insertion order).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a vote count is negative.
    pub async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Choice>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChoiceRow>(
            r"
            SELECT id, question_id, choice_text, votes
            FROM polls.choice
            WHERE question_id = $1
            ORDER BY id
            ",
        )
        .bind(question_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Choice::try_from).collect()
    }

    /// Add a choice with zero votes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the question does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        question_id: QuestionId,
        choice_text: &Label,
    ) -> Result<Choice, RepositoryError> {
        insert_choice(self.pool, question_id, choice_text).await
    }

    /// Add one vote to a choice of the given question.
    ///
    /// The ownership check and the increment are one statement, so
    /// concurrent votes on the same row are serialized by `PostgreSQL` and
    /// none are lost.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> Result<VoteOutcome, RepositoryError> {
        let row = sqlx::query_as::<_, ChoiceRow>(
            r"
            UPDATE polls.choice
            SET votes = votes + 1
            WHERE id = $1 AND question_id = $2
            RETURNING id, question_id, choice_text, votes
            ",
        )
        .bind(choice_id)
        .bind(question_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(VoteOutcome::Recorded(row.try_into()?)),
            None => Ok(VoteOutcome::InvalidSelection),
        }
    }
}

/// Insert a choice with zero votes.
///
/// A missing question surfaces as the foreign-key violation and maps to
/// `RepositoryError::NotFound`.
pub(super) async fn insert_choice<'e, E>(
    executor: E,
    question_id: QuestionId,
    choice_text: &Label,
) -> Result<Choice, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ChoiceRow>(
        r"
        INSERT INTO polls.choice (question_id, choice_text)
        VALUES ($1, $2)
        RETURNING id, question_id, choice_text, votes
        ",
    )
    .bind(question_id)
    .bind(choice_text.as_str())
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_foreign_key_violation()
        {
            return RepositoryError::NotFound;
        }
        RepositoryError::Database(e)
    })?;

    row.try_into()
}
