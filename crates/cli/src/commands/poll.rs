//! Question and choice management commands.
//!
//! # Usage
//!
//! ```bash
//! polls question create --text "What's new?" --pub-date 2026-03-01T09:00:00Z
//! polls question list
//! polls question delete --id 3
//! polls choice add --question 3 --text "Not much"
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use polls_core::{Label, QuestionId};
use polls_web::db::RepositoryError;
use polls_web::models::NewQuestion;

use super::{CliError, store};

/// Create a question, published now unless told otherwise.
///
/// # Errors
///
/// Returns an error if the text or date is invalid or the insert fails.
pub async fn create_question(
    text: &str,
    pub_date: Option<&str>,
    in_days: Option<i64>,
) -> Result<QuestionId, CliError> {
    let input = NewQuestion {
        question_text: parse_label("question text", text)?,
        pub_date: resolve_pub_date(pub_date, in_days, Utc::now())?,
    };

    let question = store().await?.create_question(&input).await?;

    tracing::info!(
        "Created question {} published at {}: {}",
        question.id,
        question.pub_date.to_rfc3339(),
        question.question_text
    );
    Ok(question.id)
}

/// Log every question with its choices and vote counts.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub async fn list_questions() -> Result<(), CliError> {
    let store = store().await?;
    let questions = store.all_questions().await?;
    let now = Utc::now();

    if questions.is_empty() {
        tracing::info!("No questions.");
        return Ok(());
    }

    for question in questions {
        let state = if !question.is_published(now) {
            "scheduled"
        } else if question.was_published_recently(now) {
            "new"
        } else {
            "published"
        };
        tracing::info!(
            "[{}] {} ({state}, {})",
            question.id,
            question.question_text,
            question.pub_date.to_rfc3339()
        );

        for choice in store.choices(question.id).await? {
            tracing::info!(
                "    [{}] {} -- {}",
                choice.id,
                choice.choice_text,
                polls_core::vote_count_label(i64::from(choice.votes))
            );
        }
    }
    Ok(())
}

/// Delete a question and, by cascade, its choices.
///
/// # Errors
///
/// Returns `CliError::QuestionNotFound` if nothing was deleted.
pub async fn delete_question(id: &str) -> Result<(), CliError> {
    let question_id = parse_question_id(id)?;

    if !store().await?.delete_question(question_id).await? {
        return Err(CliError::QuestionNotFound(id.to_owned()));
    }

    tracing::info!("Deleted question {question_id}");
    Ok(())
}

/// Add a choice with zero votes to an existing question.
///
/// # Errors
///
/// Returns `CliError::QuestionNotFound` if the question does not exist.
pub async fn add_choice(question: &str, text: &str) -> Result<(), CliError> {
    let question_id = parse_question_id(question)?;
    let choice_text = parse_label("choice text", text)?;

    let choice = store()
        .await?
        .add_choice(question_id, &choice_text)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CliError::QuestionNotFound(question.to_owned()),
            other => CliError::Repository(other),
        })?;

    tracing::info!(
        "Added choice {} to question {}: {}",
        choice.id,
        question_id,
        choice.choice_text
    );
    Ok(())
}

pub(crate) fn parse_label(field: &'static str, value: &str) -> Result<Label, CliError> {
    Label::parse(value).map_err(|e| CliError::InvalidArgument {
        field,
        reason: e.to_string(),
    })
}

fn parse_question_id(value: &str) -> Result<QuestionId, CliError> {
    value.parse().map_err(|_| CliError::InvalidArgument {
        field: "question id",
        reason: format!("{value:?} is not an integer"),
    })
}

/// Pick the publication time from an explicit RFC 3339 date or a day offset.
pub(crate) fn resolve_pub_date(
    pub_date: Option<&str>,
    in_days: Option<i64>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, CliError> {
    match (pub_date, in_days) {
        (Some(_), Some(_)) => Err(CliError::InvalidArgument {
            field: "pub date",
            reason: "give either a date or a day offset, not both".to_string(),
        }),
        (Some(raw), None) => DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| CliError::InvalidArgument {
                field: "pub date",
                reason: e.to_string(),
            }),
        (None, Some(days)) => TimeDelta::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| CliError::InvalidArgument {
                field: "day offset",
                reason: format!("{days} days is out of range"),
            }),
        (None, None) => Ok(now),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_resolve_pub_date_defaults_to_now() {
        assert_eq!(resolve_pub_date(None, None, now()).unwrap(), now());
    }

    #[test]
    fn test_resolve_pub_date_offsets() {
        let future = resolve_pub_date(None, Some(30), now()).unwrap();
        assert_eq!(future, Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap());

        let past = resolve_pub_date(None, Some(-30), now()).unwrap();
        assert_eq!(past, Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_pub_date_rfc3339() {
        let parsed = resolve_pub_date(Some("2026-02-01T08:30:00+01:00"), None, now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 1, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_resolve_pub_date_rejects_bad_input() {
        assert!(resolve_pub_date(Some("yesterday"), None, now()).is_err());
        assert!(resolve_pub_date(Some("2026-02-01T00:00:00Z"), Some(1), now()).is_err());
        assert!(resolve_pub_date(None, Some(i64::MAX), now()).is_err());
    }

    #[test]
    fn test_parse_question_id() {
        assert_eq!(parse_question_id("4").unwrap(), QuestionId::new(4));
        assert!(matches!(
            parse_question_id("four"),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_label_rejects_blank() {
        assert!(parse_label("choice text", "   ").is_err());
        assert_eq!(parse_label("choice text", " Red ").unwrap().as_str(), "Red");
    }
}
