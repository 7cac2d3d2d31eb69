//! Question and choice domain types.
//!
//! These are validated domain objects, separate from the database row types.

use chrono::{DateTime, Utc};

use polls_core::{ChoiceId, Label, QuestionId};

/// A poll prompt with a scheduled publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    /// When the question becomes visible on the index and detail pages.
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// Whether the question is visible at `now`.
    #[must_use]
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        polls_core::is_published(self.pub_date, now)
    }

    /// Whether the question went live within the last day.
    #[must_use]
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        polls_core::was_published_recently(self.pub_date, now)
    }
}

/// One selectable answer to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: ChoiceId,
    pub question_id: QuestionId,
    pub choice_text: String,
    /// Never negative; only ever incremented by one per vote.
    pub votes: i32,
}

/// Input for creating a question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question_text: Label,
    pub pub_date: DateTime<Utc>,
}

/// A question and its choices, created together.
#[derive(Debug, Clone)]
pub struct NewPoll {
    pub question: NewQuestion,
    pub choices: Vec<Label>,
}

/// Result of trying to record a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The choice belonged to the question and now carries the new count.
    Recorded(Choice),
    /// No choice with that id belongs to the question. Nothing was written.
    InvalidSelection,
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn question(pub_date: DateTime<Utc>) -> Question {
        Question {
            id: QuestionId::new(1),
            question_text: "What's new?".to_string(),
            pub_date,
        }
    }

    #[test]
    fn test_future_question_is_not_published() {
        let now = Utc::now();
        let q = question(now + TimeDelta::days(30));
        assert!(!q.is_published(now));
        assert!(!q.was_published_recently(now));
    }

    #[test]
    fn test_recent_question() {
        let now = Utc::now();
        let q = question(now - TimeDelta::hours(1));
        assert!(q.is_published(now));
        assert!(q.was_published_recently(now));
    }

    #[test]
    fn test_old_question_is_published_but_not_recent() {
        let now = Utc::now();
        let q = question(now - TimeDelta::days(2));
        assert!(q.is_published(now));
        assert!(!q.was_published_recently(now));
    }
}
