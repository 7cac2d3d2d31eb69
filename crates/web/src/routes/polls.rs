//! Poll route handlers: index, detail, results and vote.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use polls_core::{ChoiceId, INDEX_LIMIT, QuestionId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CSRF_FIELD, CsrfToken, verify_csrf_token};
use crate::models::{Choice, Question, VoteOutcome};
use crate::state::AppState;

/// Shown above the form when a vote names no valid choice.
pub const NO_CHOICE_SELECTED: &str = "You didn't select a choice.";

/// Index page: the latest published questions.
#[derive(Template, WebTemplate)]
#[template(path = "polls/index.html")]
pub struct IndexTemplate {
    pub latest_question_list: Vec<Question>,
}

/// Detail page: the voting form.
#[derive(Template, WebTemplate)]
#[template(path = "polls/detail.html")]
pub struct DetailTemplate {
    pub question: Question,
    pub choices: Vec<Choice>,
    pub csrf_token: String,
    /// Only set when re-rendering after a rejected vote.
    pub error_message: Option<&'static str>,
}

/// Results page: vote counts per choice.
#[derive(Template, WebTemplate)]
#[template(path = "polls/results.html")]
pub struct ResultsTemplate {
    pub question: Question,
    pub choices: Vec<Choice>,
}

/// Vote form body.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VoteForm {
    pub csrf_token: Option<String>,
    pub choice: Option<String>,
}

impl VoteForm {
    /// Pick the known fields out of a decoded body.
    ///
    /// A repeated field keeps its last value; unknown fields are ignored.
    #[must_use]
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (name, value) in fields {
            match name.as_str() {
                CSRF_FIELD => form.csrf_token = Some(value),
                "choice" => form.choice = Some(value),
                _ => {}
            }
        }
        form
    }
}

/// URL of a question's results page.
#[must_use]
pub fn results_path(question_id: QuestionId) -> String {
    format!("/{question_id}/results/")
}

/// Path segments that are not integer ids name no question.
fn parse_question_id(raw: &str) -> Result<QuestionId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("question {raw}")))
}

fn question_not_found(id: QuestionId) -> AppError {
    AppError::NotFound(format!("question {id}"))
}

/// Display the latest five published questions, newest first.
///
/// GET /
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<IndexTemplate> {
    let latest_question_list = state
        .store()
        .latest_published(Utc::now(), INDEX_LIMIT)
        .await?;

    Ok(IndexTemplate {
        latest_question_list,
    })
}

/// Display the voting form for a published question.
///
/// GET /{question_id}/
#[instrument(skip(state, csrf))]
pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    csrf: CsrfToken,
) -> Result<DetailTemplate> {
    let question_id = parse_question_id(&question_id)?;
    let store = state.store();

    let question = store
        .published_question(question_id, Utc::now())
        .await?
        .ok_or_else(|| question_not_found(question_id))?;
    let choices = store.choices(question.id).await?;

    Ok(DetailTemplate {
        question,
        choices,
        csrf_token: csrf.value().to_owned(),
        error_message: None,
    })
}

/// Display vote counts. Any existing question qualifies, published or not.
///
/// GET /{question_id}/results/
#[instrument(skip(state))]
pub async fn results(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<ResultsTemplate> {
    let question_id = parse_question_id(&question_id)?;
    let store = state.store();

    let question = store
        .question(question_id)
        .await?
        .ok_or_else(|| question_not_found(question_id))?;
    let choices = store.choices(question.id).await?;

    Ok(ResultsTemplate { question, choices })
}

/// Record a vote and redirect to the results page.
///
/// A missing or foreign `choice` re-renders the form with an error and a 200
/// status instead. Replaying the same POST counts again.
///
/// POST /{question_id}/vote/
#[instrument(skip(state, session, fields))]
pub async fn vote(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let form = VoteForm::from_fields(fields);
    verify_csrf_token(&session, form.csrf_token.as_deref()).await?;

    let question_id = parse_question_id(&question_id)?;
    let store = state.store();

    let question = store
        .question(question_id)
        .await?
        .ok_or_else(|| question_not_found(question_id))?;

    let selected = form
        .choice
        .as_deref()
        .and_then(|raw| raw.parse::<ChoiceId>().ok());

    let outcome = match selected {
        Some(choice_id) => store.record_vote(question.id, choice_id).await?,
        None => VoteOutcome::InvalidSelection,
    };

    match outcome {
        VoteOutcome::Recorded(choice) => {
            tracing::info!(
                question_id = %question.id,
                choice_id = %choice.id,
                votes = choice.votes,
                "Vote recorded"
            );
            add_breadcrumb(
                "poll",
                "Vote recorded",
                &[
                    ("question_id", question.id.to_string()),
                    ("choice_id", choice.id.to_string()),
                ],
            );
            Ok(Redirect::to(&results_path(question.id)).into_response())
        }
        VoteOutcome::InvalidSelection => {
            tracing::debug!(
                question_id = %question.id,
                choice = ?form.choice,
                "Vote without a valid choice"
            );
            let choices = store.choices(question.id).await?;
            let csrf = CsrfToken::for_session(&session).await?;

            Ok(DetailTemplate {
                question,
                choices,
                csrf_token: csrf.value().to_owned(),
                error_message: Some(NO_CHOICE_SELECTED),
            }
            .into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;

    fn question() -> Question {
        Question {
            id: QuestionId::new(7),
            question_text: "Favorite color?".to_string(),
            pub_date: Utc::now() - TimeDelta::hours(1),
        }
    }

    fn choice(id: i32, text: &str, votes: i32) -> Choice {
        Choice {
            id: ChoiceId::new(id),
            question_id: QuestionId::new(7),
            choice_text: text.to_string(),
            votes,
        }
    }

    #[test]
    fn test_index_template_empty() {
        let html = IndexTemplate {
            latest_question_list: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("No polls are available."));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn test_index_template_links_to_detail() {
        let html = IndexTemplate {
            latest_question_list: vec![question()],
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"<a href="/7/">Favorite color?</a>"#));
        assert!(!html.contains("No polls are available."));
    }

    #[test]
    fn test_detail_template_radio_per_choice() {
        let html = DetailTemplate {
            question: question(),
            choices: vec![choice(1, "Red", 0), choice(2, "Blue", 0)],
            csrf_token: "tok123".to_string(),
            error_message: None,
        }
        .render()
        .unwrap();

        assert_eq!(html.matches(r#"type="radio""#).count(), 2);
        assert!(html.contains(r#"id="choice0" value="1""#));
        assert!(html.contains(r#"<label for="choice1">Blue</label>"#));
        assert!(html.contains(r#"name="csrfmiddlewaretoken" value="tok123""#));
        assert!(html.contains(r#"action="/7/vote/""#));
        assert!(!html.contains(NO_CHOICE_SELECTED));
    }

    #[test]
    fn test_detail_template_error_banner() {
        let html = DetailTemplate {
            question: question(),
            choices: Vec::new(),
            csrf_token: "tok".to_string(),
            error_message: Some(NO_CHOICE_SELECTED),
        }
        .render()
        .unwrap();

        assert!(html.contains("<strong>You didn't select a choice.</strong>"));
        assert_eq!(html.matches(r#"type="radio""#).count(), 0);
    }

    #[test]
    fn test_detail_template_escapes_choice_text() {
        let html = DetailTemplate {
            question: question(),
            choices: vec![choice(1, "<b>bold</b>", 0)],
            csrf_token: "tok".to_string(),
            error_message: None,
        }
        .render()
        .unwrap();
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn test_results_template_pluralizes() {
        let html = ResultsTemplate {
            question: question(),
            choices: vec![
                choice(1, "Red", 0),
                choice(2, "Blue", 1),
                choice(3, "Green", 2),
            ],
        }
        .render()
        .unwrap();

        assert!(html.contains("Red -- 0 votes"));
        assert!(html.contains("Blue -- 1 vote<"));
        assert!(html.contains("Green -- 2 votes"));
        assert!(html.contains(r#"<a href="/7/">Vote again?</a>"#));
    }

    #[test]
    fn test_results_template_without_choices() {
        let html = ResultsTemplate {
            question: question(),
            choices: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("<h1>Favorite color?</h1>"));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn test_parse_question_id() {
        assert_eq!(parse_question_id("12").unwrap(), QuestionId::new(12));
        assert!(matches!(
            parse_question_id("twelve"),
            Err(AppError::NotFound(_))
        ));
    }

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_vote_form_reads_known_fields() {
        let form = VoteForm::from_fields(fields(&[
            ("csrfmiddlewaretoken", "tok"),
            ("choice", "4"),
            ("extra", "ignored"),
        ]));
        assert_eq!(form.csrf_token.as_deref(), Some("tok"));
        assert_eq!(form.choice.as_deref(), Some("4"));
    }

    #[test]
    fn test_vote_form_repeated_choice_keeps_last() {
        let form = VoteForm::from_fields(fields(&[("choice", "1"), ("choice", "2")]));
        assert_eq!(form.choice.as_deref(), Some("2"));
    }

    #[test]
    fn test_vote_form_empty_body() {
        assert_eq!(VoteForm::from_fields(Vec::new()), VoteForm::default());
    }

    #[test]
    fn test_results_path() {
        assert_eq!(results_path(QuestionId::new(3)), "/3/results/");
    }
}
