use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::ActivityId;

/// Default length of a walking activity when the program does not set one.
pub const DEFAULT_WALK_MINUTES: u32 = 15;
/// Default length of a breathing activity when the program does not set one.
pub const DEFAULT_BREATHING_MINUTES: u32 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("activity title cannot be empty")]
    EmptyTitle,

    #[error("activity order must be >= 1")]
    InvalidOrder,

    #[error("activity duration must be > 0 minutes")]
    InvalidDuration,

    #[error("{kind:?} activity content must be an absolute URL: {raw}")]
    InvalidContentUrl { kind: ActivityKind, raw: String },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Video,
    Audio,
    Journal,
    Walk,
    Breathing,
}

/// How an activity of a given kind gets marked complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Patient confirms after watching or listening.
    Manual,
    /// Completes once a valid journal entry is saved.
    Journal,
    /// Completes through the timer's complete action.
    Timed,
}

impl ActivityKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Video => "Watch Video",
            ActivityKind::Audio => "Listen to Audio",
            ActivityKind::Journal => "Journal Entry",
            ActivityKind::Walk => "Walking Activity",
            ActivityKind::Breathing => "Breathing Exercise",
        }
    }

    #[must_use]
    pub fn completion(self) -> CompletionMode {
        match self {
            ActivityKind::Video | ActivityKind::Audio => CompletionMode::Manual,
            ActivityKind::Journal => CompletionMode::Journal,
            ActivityKind::Walk | ActivityKind::Breathing => CompletionMode::Timed,
        }
    }

    #[must_use]
    pub fn default_duration_minutes(self) -> Option<u32> {
        match self {
            ActivityKind::Walk => Some(DEFAULT_WALK_MINUTES),
            ActivityKind::Breathing => Some(DEFAULT_BREATHING_MINUTES),
            _ => None,
        }
    }

    fn requires_url(self) -> bool {
        matches!(self, ActivityKind::Video | ActivityKind::Audio)
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "journal" => Ok(Self::Journal),
            "walk" => Ok(Self::Walk),
            "breathing" => Ok(Self::Breathing),
            other => Err(format!("unknown activity type: {other}")),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated activity as it arrives from the data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub id: ActivityId,
    pub title: String,
    pub description: String,
    pub kind: ActivityKind,
    pub content: String,
    pub duration_minutes: Option<u32>,
    pub order: u32,
    pub completed: bool,
}

impl ActivityDraft {
    /// Validate the draft into an `Activity`.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError` if the title is blank, the order is zero, the
    /// duration is zero, or media content is not an absolute URL.
    pub fn validate(self) -> Result<Activity, ActivityError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ActivityError::EmptyTitle);
        }
        if self.order == 0 {
            return Err(ActivityError::InvalidOrder);
        }
        if self.duration_minutes == Some(0) {
            return Err(ActivityError::InvalidDuration);
        }
        if self.kind.requires_url() && Url::parse(self.content.trim()).is_err() {
            return Err(ActivityError::InvalidContentUrl {
                kind: self.kind,
                raw: self.content,
            });
        }

        Ok(Activity {
            id: self.id,
            title,
            description: self.description,
            kind: self.kind,
            content: self.content.trim().to_string(),
            duration_minutes: self.duration_minutes,
            order: self.order,
            completed: self.completed,
        })
    }
}

//
// ─── ACTIVITY ──────────────────────────────────────────────────────────────────
//

/// A single therapeutic task inside a program.
///
/// Everything except `completed` is fixed after validation, and `completed`
/// only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    id: ActivityId,
    title: String,
    description: String,
    kind: ActivityKind,
    content: String,
    duration_minutes: Option<u32>,
    order: u32,
    completed: bool,
}

impl Activity {
    #[must_use]
    pub fn id(&self) -> ActivityId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    /// Declared duration, falling back to the kind's default for timed activities.
    #[must_use]
    pub fn effective_duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
            .or_else(|| self.kind.default_duration_minutes())
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns `true` if this call flipped the flag.
    pub(crate) fn mark_completed(&mut self) -> bool {
        let changed = !self.completed;
        self.completed = true;
        changed
    }
}

/// Derived availability of an activity within its program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Completed,
    Available,
    Locked,
}

impl ActivityStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Available => "Available",
            ActivityStatus::Locked => "Locked",
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
