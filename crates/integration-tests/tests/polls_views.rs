//! Integration tests for the read-only poll pages.
//!
//! These tests drive the index, detail and results pages through the full
//! middleware stack against the in-memory store.

use axum::http::StatusCode;
use polls_integration_tests::TestApp;

// =============================================================================
// Index
// =============================================================================

#[tokio::test]
async fn test_index_without_questions() {
    let app = TestApp::new();

    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No polls are available."));
    assert!(response.body.contains("/static/polls/style.css"));
}

#[tokio::test]
async fn test_index_hides_future_questions() {
    let app = TestApp::new();
    app.question("Past question.", -30).await;
    app.question("Future question.", 30).await;

    let response = app.get("/", None).await;

    assert!(response.body.contains("Past question."));
    assert!(!response.body.contains("Future question."));
}

#[tokio::test]
async fn test_index_only_future_questions_is_empty() {
    let app = TestApp::new();
    app.question("Future question.", 30).await;

    let response = app.get("/", None).await;

    assert!(response.body.contains("No polls are available."));
}

#[tokio::test]
async fn test_index_shows_latest_five_newest_first() {
    let app = TestApp::new();
    for days in 1..=7 {
        app.question(&format!("Asked {days} days ago"), -days).await;
    }

    let response = app.get("/", None).await;
    let body = &response.body;

    assert_eq!(body.matches("<li>").count(), 5);
    assert!(!body.contains("Asked 6 days ago"));
    assert!(!body.contains("Asked 7 days ago"));

    let positions: Vec<usize> = (1..=5)
        .map(|days| {
            body.find(&format!("Asked {days} days ago"))
                .unwrap_or(usize::MAX)
        })
        .collect();
    assert!(!positions.contains(&usize::MAX), "missing entries: {positions:?}");
    assert!(
        positions.is_sorted(),
        "index should list newest first: {positions:?}"
    );
}

#[tokio::test]
async fn test_index_links_to_detail() {
    let app = TestApp::new();
    let question = app.question("Linked?", -1).await;

    let response = app.get("/", None).await;

    assert!(
        response
            .body
            .contains(&format!(r#"<a href="/{}/">Linked?</a>"#, question.id))
    );
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_detail_future_question_is_not_found() {
    let app = TestApp::new();
    let question = app.question("Future question.", 5).await;

    let response = app.get(&format!("/{}/", question.id), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_unknown_and_malformed_ids_are_not_found() {
    let app = TestApp::new();

    assert_eq!(app.get("/999/", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/abc/", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_renders_form() {
    let app = TestApp::new();
    let question = app.question("Favorite color?", -1).await;
    let red = app.choice(question.id, "Red").await;
    let blue = app.choice(question.id, "Blue").await;

    let response = app.get(&format!("/{}/", question.id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Favorite color?"));
    assert_eq!(response.radio_count(), 2);
    assert!(
        response
            .body
            .contains(&format!(r#"id="choice0" value="{}""#, red.id))
    );
    assert!(
        response
            .body
            .contains(&format!(r#"id="choice1" value="{}""#, blue.id))
    );
    assert!(response.body.contains(r#"<label for="choice1">Blue</label>"#));
    assert!(
        response
            .body
            .contains(&format!(r#"action="/{}/vote/""#, question.id))
    );
    assert!(response.body.contains(r#"value="Vote""#));
    assert!(response.csrf_token().is_some_and(|t| !t.is_empty()));
    assert!(response.session_cookie().is_some());
    assert!(!response.body.contains("You didn't select a choice."));
}

#[tokio::test]
async fn test_detail_without_choices_has_no_radios() {
    let app = TestApp::new();
    let question = app.question("Empty?", -1).await;

    let response = app.get(&format!("/{}/", question.id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.radio_count(), 0);
}

#[tokio::test]
async fn test_detail_reuses_session_token() {
    let app = TestApp::new();
    let question = app.question("Stable?", -1).await;
    let form = app.open_form(question.id).await;

    let again = app
        .get(&format!("/{}/", question.id), Some(&form.cookie))
        .await;

    assert_eq!(again.csrf_token(), Some(form.token));
}

// =============================================================================
// Results
// =============================================================================

#[tokio::test]
async fn test_results_without_choices() {
    let app = TestApp::new();
    let question = app.question("Empty?", -1).await;

    let response = app.get(&format!("/{}/results/", question.id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>Empty?</h1>"));
    assert!(!response.body.contains("<li>"));
}

#[tokio::test]
async fn test_results_ignores_publish_date() {
    let app = TestApp::new();
    let question = app.question("Scheduled?", 10).await;
    app.choice(question.id, "Yes").await;

    let response = app.get(&format!("/{}/results/", question.id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Yes -- 0 votes"));
}

#[tokio::test]
async fn test_results_unknown_question_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/42/results/", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_results_vote_again_link() {
    let app = TestApp::new();
    let question = app.question("Again?", -1).await;

    let response = app.get(&format!("/{}/results/", question.id), None).await;

    assert!(
        response
            .body
            .contains(&format!(r#"<a href="/{}/">Vote again?</a>"#, question.id))
    );
}
