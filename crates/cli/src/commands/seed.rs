//! Seed the database with questions and choices from a YAML file.
//!
//! ```yaml
//! questions:
//!   - text: "What's new?"
//!     choices: ["Not much", "The sky"]
//!   - text: "Coming soon?"
//!     in_days: 3
//!   - text: "Launch day?"
//!     pub_date: "2026-03-01T09:00:00Z"
//!     choices: ["Yes", "No"]
//! ```
//!
//! Each question is published now unless `pub_date` or `in_days` says
//! otherwise. The whole file is validated before anything is written, and
//! the inserts run as one unit: a failure leaves the database untouched.

use chrono::{DateTime, Utc};
use polls_web::models::{NewPoll, NewQuestion};
use serde::Deserialize;

use super::poll::{parse_label, resolve_pub_date};
use super::{CliError, store};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedQuestion {
    text: String,
    pub_date: Option<String>,
    in_days: Option<i64>,
    #[serde(default)]
    choices: Vec<String>,
}

/// Seed questions and choices from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or if an insert
/// fails. Nothing is kept when an insert fails.
pub async fn from_file(path: &str) -> Result<(), CliError> {
    tracing::info!(path = %path, "Loading seed file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_owned(),
            source,
        })?;
    let planned = plan(&content, Utc::now())?;

    tracing::info!(questions = planned.len(), "Seed file validated");

    let store = store().await?;
    let created = store.import(&planned).await?;
    let mut choice_count = 0usize;

    for (question, choices) in &created {
        choice_count += choices.len();
        tracing::info!(
            "  [{}] {} ({} choices)",
            question.id,
            question.question_text,
            choices.len()
        );
    }

    tracing::info!("Seeding complete!");
    tracing::info!("  Questions created: {}", created.len());
    tracing::info!("  Choices created: {choice_count}");
    Ok(())
}

/// Parse and validate a seed document without touching the database.
fn plan(content: &str, now: DateTime<Utc>) -> Result<Vec<NewPoll>, CliError> {
    let file: SeedFile = serde_yaml::from_str(content)?;

    file.questions
        .into_iter()
        .map(|q| {
            Ok(NewPoll {
                question: NewQuestion {
                    question_text: parse_label("question text", &q.text)?,
                    pub_date: resolve_pub_date(q.pub_date.as_deref(), q.in_days, now)?,
                },
                choices: q
                    .choices
                    .iter()
                    .map(|c| parse_label("choice text", c))
                    .collect::<Result<_, _>>()?,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plan_resolves_dates_and_choices() {
        let yaml = r#"
questions:
  - text: "What's new?"
    choices: ["Not much", "The sky"]
  - text: "Coming soon?"
    in_days: 3
  - text: "Launch day?"
    pub_date: "2026-02-01T09:00:00Z"
    choices: ["Yes"]
"#;
        let planned = plan(yaml, now()).unwrap();
        assert_eq!(planned.len(), 3);

        assert_eq!(planned[0].question.question_text.as_str(), "What's new?");
        assert_eq!(planned[0].question.pub_date, now());
        assert_eq!(planned[0].choices.len(), 2);

        assert_eq!(planned[1].question.pub_date, now() + TimeDelta::days(3));
        assert!(planned[1].choices.is_empty());

        assert_eq!(
            planned[2].question.pub_date,
            Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_plan_rejects_blank_choice() {
        let yaml = r#"
questions:
  - text: "Pick one"
    choices: ["Fine", "  "]
"#;
        assert!(matches!(
            plan(yaml, now()),
            Err(CliError::InvalidArgument {
                field: "choice text",
                ..
            })
        ));
    }

    #[test]
    fn test_plan_rejects_unknown_fields() {
        let yaml = r#"
questions:
  - text: "Pick one"
    votes: 10
"#;
        assert!(matches!(plan(yaml, now()), Err(CliError::Yaml(_))));
    }

    #[test]
    fn test_plan_rejects_overlong_question() {
        let yaml = format!("questions:\n  - text: \"{}\"\n", "x".repeat(201));
        assert!(plan(&yaml, now()).is_err());
    }
}
