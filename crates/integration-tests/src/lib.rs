//! End-to-end test harness for the polls site.
//!
//! Drives the complete router in-process with `tower::ServiceExt::oneshot`
//! against the in-memory poll store and session store, so no database or
//! network listener is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p polls-integration-tests
//! ```

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{TimeDelta, Utc};
use tower::ServiceExt;

use polls_core::{ChoiceId, Label, QuestionId};
use polls_web::app::app;
use polls_web::config::PollsConfig;
use polls_web::db::{MemoryStore, PollStore};
use polls_web::middleware::{CSRF_FIELD, create_session_layer};
use polls_web::models::{Choice, NewQuestion, Question};
use polls_web::state::AppState;

/// Largest response body the harness will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A fresh application with empty stores.
pub struct TestApp {
    router: Router,
    store: PollStore,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Session cookie and anti-forgery token scraped from a detail page.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub cookie: String,
    pub token: String,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build the router over a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let config = PollsConfig {
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static").into(),
            ..PollsConfig::default()
        };
        let store = PollStore::from(MemoryStore::new());
        let session_layer =
            create_session_layer(tower_sessions::MemoryStore::default(), &config);
        let router = app(AppState::new(config, store.clone()), session_layer);

        Self { router, store }
    }

    /// Direct access to the store behind the router.
    #[must_use]
    pub const fn store(&self) -> &PollStore {
        &self.store
    }

    /// Create a question published `days` days from now (negative for the past).
    ///
    /// # Panics
    ///
    /// Panics if the text is not a valid label or the insert fails.
    pub async fn question(&self, text: &str, days: i64) -> Question {
        let input = NewQuestion {
            question_text: Label::parse(text).expect("valid question text"),
            pub_date: Utc::now() + TimeDelta::days(days),
        };
        self.store
            .create_question(&input)
            .await
            .expect("create question")
    }

    /// Add a choice to a question.
    ///
    /// # Panics
    ///
    /// Panics if the text is not a valid label or the question is missing.
    pub async fn choice(&self, question_id: QuestionId, text: &str) -> Choice {
        let label = Label::parse(text).expect("valid choice text");
        self.store
            .add_choice(question_id, &label)
            .await
            .expect("add choice")
    }

    /// Current vote count of one choice.
    ///
    /// # Panics
    ///
    /// Panics if the choice does not belong to the question.
    pub async fn votes(&self, question_id: QuestionId, choice_id: ChoiceId) -> i32 {
        self.store
            .choices(question_id)
            .await
            .expect("list choices")
            .into_iter()
            .find(|c| c.id == choice_id)
            .map(|c| c.votes)
            .expect("choice belongs to question")
    }

    /// GET a path, optionally with a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).expect("valid request"))
            .await
    }

    /// POST an urlencoded form.
    ///
    /// Values are sent verbatim, so they must already be URL-safe (ids and
    /// anti-forgery tokens are).
    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body)).expect("valid request"))
            .await
    }

    /// Load a question's detail page and keep its session and token.
    ///
    /// # Panics
    ///
    /// Panics if the page is not a 200 or carries no cookie or token.
    pub async fn open_form(&self, question_id: QuestionId) -> FormSession {
        let response = self.get(&format!("/{question_id}/"), None).await;
        assert_eq!(response.status, StatusCode::OK, "detail page should load");

        FormSession {
            cookie: response.session_cookie().expect("session cookie"),
            token: response.csrf_token().expect("anti-forgery token"),
        }
    }

    /// Open the form for a question and submit a vote through it.
    pub async fn vote(&self, question_id: QuestionId, choice: Option<&str>) -> TestResponse {
        let form = self.open_form(question_id).await;
        let mut fields = vec![(CSRF_FIELD, form.token.as_str())];
        if let Some(choice) = choice {
            fields.push(("choice", choice));
        }
        self.post_form(
            &format!("/{question_id}/vote/"),
            Some(&form.cookie),
            &fields,
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl TestResponse {
    /// `name=value` of the first `Set-Cookie` header.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)?
            .to_str()
            .ok()?
            .split(';')
            .next()
            .map(str::to_owned)
    }

    /// Value of the hidden anti-forgery field in the page.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        let marker = format!(r#"name="{CSRF_FIELD}" value=""#);
        let start = self.body.find(&marker)? + marker.len();
        let rest = self.body.get(start..)?;
        rest.split('"').next().map(str::to_owned)
    }

    /// Target of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION)?.to_str().ok()
    }

    /// Number of radio inputs in the page.
    #[must_use]
    pub fn radio_count(&self) -> usize {
        self.body.matches(r#"type="radio""#).count()
    }
}
