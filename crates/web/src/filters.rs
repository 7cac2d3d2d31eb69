//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Plural suffix for a count: empty for exactly one, `s` otherwise.
///
/// Values that are not integers get no suffix.
///
/// Usage in templates: `{{ choice.votes }} vote{{ choice.votes|pluralize }}`
#[askama::filter_fn]
pub fn pluralize(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(value
        .to_string()
        .trim()
        .parse::<i64>()
        .map_or("", polls_core::pluralize))
}

/// Returns the URL of the polls stylesheet.
///
/// Carries the content hash from the build script as a `v` query parameter,
/// or no query when the build could not hash the file.
///
/// Usage in templates: `{{ ""|stylesheet_href }}`
#[askama::filter_fn]
pub fn stylesheet_href(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_path(env!("STYLE_HASH")))
}

const STYLESHEET_PATH: &str = "/static/polls/style.css";

fn stylesheet_path(hash: &str) -> String {
    if hash.is_empty() {
        STYLESHEET_PATH.to_string()
    } else {
        format!("{STYLESHEET_PATH}?v={hash}")
    }
}
