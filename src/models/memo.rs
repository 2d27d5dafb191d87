//! Viewing memo data model.

use crate::{Error, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Minimum memo content length, in characters.
pub const MIN_CONTENT_CHARS: usize = 5;

/// A personal viewing memo attached to a favorited movie.
///
/// Stored locally only. Field names are camelCase on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    /// Client generated UUID.
    pub id: String,
    pub movie_id: u64,
    pub title: String,
    pub content: String,
    /// Watched date, `YYYY-MM-DD`.
    pub watched_at: String,
    /// Creation time, RFC 3339. Never changes after creation.
    pub created_at: String,
}

impl Memo {
    /// Create a new memo from validated form input.
    pub fn new(movie_id: u64, input: MemoInput) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            movie_id,
            title: input.title,
            content: input.content,
            watched_at: input.watched_at,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// Replace the editable fields, keeping id and creation time.
    pub fn revise(&self, input: MemoInput) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            title: input.title,
            content: input.content,
            watched_at: input.watched_at,
            ..self.clone()
        })
    }
}

/// Memo form input, as collected from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoInput {
    pub title: String,
    pub content: String,
    pub watched_at: String,
}

impl MemoInput {
    /// Form defaults for a movie: "<title> notes", watched today.
    pub fn defaults_for(movie_title: &str) -> Self {
        Self {
            title: format!("{} notes", movie_title),
            content: String::new(),
            watched_at: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        }
    }

    /// Check every field, reporting the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("memo title must not be empty"));
        }
        if self.content.chars().count() < MIN_CONTENT_CHARS {
            return Err(Error::validation(format!(
                "memo content must be at least {} characters",
                MIN_CONTENT_CHARS
            )));
        }
        validate_watched_at(&self.watched_at)
    }
}

/// Check a strict `YYYY-MM-DD` calendar date.
pub fn validate_watched_at(value: &str) -> Result<()> {
    let shape = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .map_err(|e| Error::other(e.to_string()))?;
    if !shape.is_match(value) {
        return Err(Error::validation(format!(
            "watched date must be YYYY-MM-DD, got '{}'",
            value
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| Error::validation(format!("'{}' is not a valid date", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str, watched_at: &str) -> MemoInput {
        MemoInput {
            title: title.to_string(),
            content: content.to_string(),
            watched_at: watched_at.to_string(),
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input("Fight Club note", "Loved it!!", "2024-03-01")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_short_content_rejected() {
        let err = input("t", "hi", "2024-03-01").validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_content_length_counts_characters() {
        // Five Hangul syllables are fifteen bytes but five characters.
        assert!(input("t", "정말좋아요", "2024-03-01").validate().is_ok());
        assert!(input("t", "좋아요", "2024-03-01").validate().is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(input("   ", "Loved it!!", "2024-03-01").validate().is_err());
    }

    #[test]
    fn test_watched_at_shape() {
        assert!(validate_watched_at("2024-03-01").is_ok());
        assert!(validate_watched_at("2024-3-1").is_err());
        assert!(validate_watched_at("2024/03/01").is_err());
        assert!(validate_watched_at("2024-03-01T00:00:00Z").is_err());
    }

    #[test]
    fn test_watched_at_calendar() {
        assert!(validate_watched_at("2024-02-29").is_ok());
        assert!(validate_watched_at("2023-02-29").is_err());
        assert!(validate_watched_at("2024-13-01").is_err());
    }

    #[test]
    fn test_new_memo_fields() {
        let memo = Memo::new(550, input("Fight Club note", "Loved it!!", "2024-03-01")).unwrap();
        assert_eq!(memo.movie_id, 550);
        assert!(uuid::Uuid::parse_str(&memo.id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&memo.created_at).is_ok());
    }

    #[test]
    fn test_revise_keeps_identity() {
        let memo = Memo::new(550, input("First", "Loved it!!", "2024-03-01")).unwrap();
        let revised = memo
            .revise(input("Second", "Even better twice", "2024-04-01"))
            .unwrap();
        assert_eq!(revised.id, memo.id);
        assert_eq!(revised.created_at, memo.created_at);
        assert_eq!(revised.title, "Second");
    }

    #[test]
    fn test_serialized_field_names() {
        let memo = Memo::new(7, input("t", "12345", "2024-03-01")).unwrap();
        let value = serde_json::to_value(&memo).unwrap();
        assert!(value.get("movieId").is_some());
        assert!(value.get("watchedAt").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_defaults_for() {
        let defaults = MemoInput::defaults_for("Fight Club");
        assert_eq!(defaults.title, "Fight Club notes");
        assert!(validate_watched_at(&defaults.watched_at).is_ok());
    }
}
