//! Short text labels for questions and choices.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Label`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The input is empty or only whitespace.
    #[error("label cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("label must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Question or choice text.
///
/// ## Constraints
///
/// - Leading and trailing whitespace is trimmed
/// - Length after trimming: 1-200 characters (matches the `VARCHAR(200)` columns)
///
/// ## Examples
///
/// ```
/// use polls_core::Label;
///
/// assert_eq!(Label::parse("  What's up?  ").unwrap().as_str(), "What's up?");
/// assert!(Label::parse("   ").is_err());
/// assert!(Label::parse(&"x".repeat(201)).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Maximum length of a label, in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Parse a `Label` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Label::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LabelError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(LabelError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Label` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_label_trims() {
        let label = Label::parse("  Favorite color?\n").unwrap();
        assert_eq!(label.as_str(), "Favorite color?");
    }

    #[test]
    fn test_label_rejects_blank() {
        assert_eq!(Label::parse(""), Err(LabelError::Empty));
        assert_eq!(Label::parse(" \t "), Err(LabelError::Empty));
    }

    #[test]
    fn test_label_length_counts_chars_not_bytes() {
        // 200 multi-byte characters are still within the limit
        assert!(Label::parse(&"é".repeat(200)).is_ok());
        assert_eq!(
            Label::parse(&"é".repeat(201)),
            Err(LabelError::TooLong { max: 200 })
        );
    }

    #[test]
    fn test_label_deserialize_validates() {
        let ok: Label = serde_json::from_str(r#""Red""#).unwrap();
        assert_eq!(ok.to_string(), "Red");
        assert!(serde_json::from_str::<Label>(r#""  ""#).is_err());
    }
}
