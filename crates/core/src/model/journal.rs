use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::ids::{ActivityId, JournalEntryId};

/// Shortest reflection the journal accepts, counted on trimmed characters.
pub const DEFAULT_MIN_JOURNAL_CHARS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("journal entry too short: {len} characters, need at least {min}")]
    TooShort { min: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    pub activity_id: ActivityId,
    pub text: String,
}

impl JournalDraft {
    #[must_use]
    pub fn new(activity_id: ActivityId, text: impl Into<String>) -> Self {
        Self {
            activity_id,
            text: text.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `JournalError::TooShort` below the default minimum length.
    pub fn validate(self, now: DateTime<Utc>) -> Result<JournalEntry, JournalError> {
        self.validate_with(now, DEFAULT_MIN_JOURNAL_CHARS)
    }

    /// # Errors
    ///
    /// Returns `JournalError::TooShort` if the trimmed text has fewer than
    /// `min_chars` characters.
    pub fn validate_with(
        self,
        now: DateTime<Utc>,
        min_chars: usize,
    ) -> Result<JournalEntry, JournalError> {
        let text = self.text.trim();
        let len = text.chars().count();
        if len < min_chars {
            return Err(JournalError::TooShort {
                min: min_chars,
                len,
            });
        }
        Ok(JournalEntry {
            id: JournalEntryId::generate(),
            activity_id: self.activity_id,
            text: text.to_string(),
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    id: JournalEntryId,
    activity_id: ActivityId,
    text: String,
    created_at: DateTime<Utc>,
}

impl JournalEntry {
    #[must_use]
    pub fn id(&self) -> JournalEntryId {
        self.id
    }

    #[must_use]
    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn short_entries_are_rejected_after_trimming() {
        let err = JournalDraft::new(ActivityId::new(3), "   too short   ")
            .validate(fixed_now())
            .unwrap_err();
        assert_eq!(err, JournalError::TooShort { min: 10, len: 9 });

        assert!(JournalDraft::new(ActivityId::new(3), "ten chars!")
            .validate(fixed_now())
            .is_ok());
    }

    #[test]
    fn valid_entry_keeps_trimmed_text() {
        let entry = JournalDraft::new(ActivityId::new(3), "\nI felt calmer after the walk.\n")
            .validate(fixed_now())
            .unwrap();
        assert_eq!(entry.text(), "I felt calmer after the walk.");
        assert_eq!(entry.activity_id(), ActivityId::new(3));
        assert_eq!(entry.created_at(), fixed_now());
    }

    #[test]
    fn custom_minimum_is_honoured() {
        let err = JournalDraft::new(ActivityId::new(1), "twelve chars")
            .validate_with(fixed_now(), 20)
            .unwrap_err();
        assert_eq!(err, JournalError::TooShort { min: 20, len: 12 });
    }
}
