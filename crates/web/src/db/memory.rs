//! In-process poll store.
//!
//! Backs `POLLS_STORE=memory` and the test suites. Semantics match the
//! `PostgreSQL` repositories: ids are assigned in insertion order, choices are
//! listed by id, deleting a question removes its choices, and a vote is a
//! single check-and-increment under one lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use polls_core::{ChoiceId, Label, QuestionId};

use super::RepositoryError;
use crate::models::{Choice, NewPoll, NewQuestion, Question, VoteOutcome};

#[derive(Debug, Default)]
struct Tables {
    questions: BTreeMap<QuestionId, Question>,
    choices: BTreeMap<ChoiceId, Choice>,
    last_question_id: i32,
    last_choice_id: i32,
}

impl Tables {
    fn insert_question(&mut self, input: &NewQuestion) -> Question {
        self.last_question_id += 1;
        let question = Question {
            id: QuestionId::new(self.last_question_id),
            question_text: input.question_text.as_str().to_owned(),
            pub_date: input.pub_date,
        };
        self.questions.insert(question.id, question.clone());
        question
    }

    fn insert_choice(
        &mut self,
        question_id: QuestionId,
        choice_text: &Label,
    ) -> Result<Choice, RepositoryError> {
        if !self.questions.contains_key(&question_id) {
            return Err(RepositoryError::NotFound);
        }
        Ok(self.push_choice(question_id, choice_text))
    }

    /// Caller guarantees the question exists.
    fn push_choice(&mut self, question_id: QuestionId, choice_text: &Label) -> Choice {
        self.last_choice_id += 1;
        let choice = Choice {
            id: ChoiceId::new(self.last_choice_id),
            question_id,
            choice_text: choice_text.as_str().to_owned(),
            votes: 0,
        };
        self.choices.insert(choice.id, choice.clone());
        choice
    }
}

/// Shared in-memory tables. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn latest_published(&self, now: DateTime<Utc>, limit: usize) -> Vec<Question> {
        let tables = self.tables.lock().await;
        let mut published: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.is_published(now))
            .cloned()
            .collect();
        published.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        published.truncate(limit);
        published
    }

    pub(crate) async fn get_published(&self, id: QuestionId, now: DateTime<Utc>) -> Option<Question> {
        self.get(id).await.filter(|q| q.is_published(now))
    }

    pub(crate) async fn get(&self, id: QuestionId) -> Option<Question> {
        self.tables.lock().await.questions.get(&id).cloned()
    }

    pub(crate) async fn list_all(&self) -> Vec<Question> {
        self.latest_published(DateTime::<Utc>::MAX_UTC, usize::MAX).await
    }

    pub(crate) async fn choices(&self, question_id: QuestionId) -> Vec<Choice> {
        self.tables
            .lock()
            .await
            .choices
            .values()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect()
    }

    /// A full counter is `DataCorruption`, matching the `INTEGER` column's
    /// out-of-range error.
    pub(crate) async fn record_vote(
        &self,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> Result<VoteOutcome, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(choice) = tables
            .choices
            .get_mut(&choice_id)
            .filter(|c| c.question_id == question_id)
        else {
            return Ok(VoteOutcome::InvalidSelection);
        };

        choice.votes = choice.votes.checked_add(1).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("vote count overflow on choice {choice_id}"))
        })?;
        Ok(VoteOutcome::Recorded(choice.clone()))
    }

    pub(crate) async fn create_question(&self, input: &NewQuestion) -> Question {
        self.tables.lock().await.insert_question(input)
    }

    pub(crate) async fn add_choice(
        &self,
        question_id: QuestionId,
        choice_text: &Label,
    ) -> Result<Choice, RepositoryError> {
        self.tables.lock().await.insert_choice(question_id, choice_text)
    }

    /// Insert every poll under one lock; readers never see a partial import.
    pub(crate) async fn import(&self, polls: &[NewPoll]) -> Vec<(Question, Vec<Choice>)> {
        let mut tables = self.tables.lock().await;
        let mut created = Vec::with_capacity(polls.len());
        for poll in polls {
            let question = tables.insert_question(&poll.question);
            let mut added = Vec::with_capacity(poll.choices.len());
            for text in &poll.choices {
                added.push(tables.push_choice(question.id, text));
            }
            created.push((question, added));
        }
        created
    }

    pub(crate) async fn delete_question(&self, id: QuestionId) -> bool {
        let mut tables = self.tables.lock().await;
        let existed = tables.questions.remove(&id).is_some();
        tables.choices.retain(|_, c| c.question_id != id);
        existed
    }
}
