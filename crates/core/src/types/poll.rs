//! Publication and display rules shared by every view.

use chrono::{DateTime, TimeDelta, Utc};

/// Number of questions shown on the index page.
pub const INDEX_LIMIT: usize = 5;

/// How far back a question still counts as "published recently", in seconds.
pub const RECENT_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Returns true if a question with this publish date is visible at `now`.
///
/// A question published exactly at `now` is visible.
#[must_use]
pub fn is_published(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    pub_date <= now
}

/// Returns true if the question was published within the last day.
///
/// Future-dated questions are never recent.
#[must_use]
pub fn was_published_recently(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - TimeDelta::seconds(RECENT_WINDOW_SECS) <= pub_date && pub_date <= now
}

/// Plural suffix for a count: `""` for exactly one, `"s"` otherwise.
#[must_use]
pub const fn pluralize(count: i64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Render a vote count as `"1 vote"` or `"N votes"`.
#[must_use]
pub fn vote_count_label(count: i64) -> String {
    format!("{count} vote{}", pluralize(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default()
    }

    #[test]
    fn test_is_published_boundary() {
        let now = now();
        assert!(is_published(now, now));
        assert!(is_published(now - TimeDelta::seconds(1), now));
        assert!(!is_published(now + TimeDelta::seconds(1), now));
    }

    #[test]
    fn test_was_published_recently_future_question() {
        let now = now();
        let pub_date = now + TimeDelta::days(30);
        assert!(!was_published_recently(pub_date, now));
    }

    #[test]
    fn test_was_published_recently_old_question() {
        let now = now();
        let pub_date = now - TimeDelta::days(1) - TimeDelta::seconds(1);
        assert!(!was_published_recently(pub_date, now));
    }

    #[test]
    fn test_was_published_recently_recent_question() {
        let now = now();
        let pub_date = now - TimeDelta::hours(23) - TimeDelta::minutes(59);
        assert!(was_published_recently(pub_date, now));
        assert!(was_published_recently(now - TimeDelta::days(1), now));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0), "s");
        assert_eq!(pluralize(1), "");
        assert_eq!(pluralize(2), "s");
    }

    #[test]
    fn test_vote_count_label() {
        assert_eq!(vote_count_label(0), "0 votes");
        assert_eq!(vote_count_label(1), "1 vote");
        assert_eq!(vote_count_label(2), "2 votes");
    }
}
