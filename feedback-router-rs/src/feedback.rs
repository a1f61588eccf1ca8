//! Validated feedback text

use std::fmt;

use crate::error::{Result, RouterError};

pub const DEFAULT_MAX_FEEDBACK_CHARS: usize = 4000;

/// One customer's free-text feedback, checked before any classifier sees it.
///
/// The only way to obtain a value is [`FeedbackText::parse`], so holding one
/// means the text is non-blank and within the length limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackText(String);

impl FeedbackText {
    /// Validate raw form input.
    ///
    /// Surrounding whitespace is trimmed; blank input and input longer than
    /// `max_chars` characters are rejected.
    pub fn parse(raw: &str, max_chars: usize) -> Result<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(RouterError::validation(
                "Please share your experience before submitting",
            ));
        }

        let length = trimmed.chars().count();
        if length > max_chars {
            return Err(RouterError::validation(format!(
                "Feedback is too long ({} characters, limit is {})",
                length, max_chars
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased copy for case-insensitive keyword matching
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for FeedbackText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
