//! Core types for the review queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ReviewError;

/// Ease factor assigned to a newly queued item.
pub const INITIAL_EASE: f64 = 2.5;

/// Ease factor floor.
pub const MIN_EASE: f64 = 1.3;

/// Interval (days) assigned to a newly queued item.
pub const INITIAL_INTERVAL: u32 = 1;

/// Interval cap in days. Reaching it means the item is mastered.
pub const MAX_INTERVAL: u32 = 365;

/// Error type recorded when the caller does not classify the mistake.
pub const DEFAULT_ERROR_TYPE: &str = "general";

/// Store-assigned identifier of a review item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subject a topic belongs to. Only used for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Math,
    English,
}

impl Default for Subject {
    fn default() -> Self {
        Self::Math
    }
}

impl Subject {
    /// Every known subject, in display order.
    pub const ALL: [Subject; 2] = [Subject::Math, Subject::English];

    /// Get the subject name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::English => "english",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "math" => Some(Self::Math),
            "english" => Some(Self::English),
            _ => None,
        }
    }
}

/// Recall quality on the 0-5 SM-2 scale.
///
/// 0 is a complete blackout, 5 a perfect response. Values of 3 and above
/// count as a successful recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    /// Validate a raw score.
    pub fn new(value: u8) -> Result<Self, ReviewError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(ReviewError::InvalidQuality(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this counts as a successful recall.
    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// The part of an item the scheduler reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval: INITIAL_INTERVAL,
            repetitions: 0,
        }
    }
}

/// A topic the learner needs to revisit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: ItemId,
    pub profile_id: String,
    pub topic: String,
    pub error_type: String,
    pub subject: Subject,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_quality: Option<u8>,
}

impl ReviewItem {
    /// Due predicate shared by every query path.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn schedule_state(&self) -> ScheduleState {
        ScheduleState {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
        }
    }

    /// Materialize a stored item from its init record and assigned id.
    pub fn from_init(id: ItemId, profile_id: &str, init: ReviewItemInit) -> Self {
        Self {
            id,
            profile_id: profile_id.to_string(),
            topic: init.topic,
            error_type: init.error_type,
            subject: init.subject,
            ease_factor: init.state.ease_factor,
            interval: init.state.interval,
            repetitions: init.state.repetitions,
            next_review: init.next_review,
            last_review: None,
            last_quality: None,
        }
    }

    /// Apply a patch in place.
    pub fn apply(&mut self, patch: &ItemPatch) {
        self.ease_factor = patch.state.ease_factor;
        self.interval = patch.state.interval;
        self.repetitions = patch.state.repetitions;
        self.next_review = patch.next_review;
        self.last_review = Some(patch.last_review);
        self.last_quality = Some(patch.last_quality);
    }
}

/// Caller input for a newly missed topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReviewItem {
    pub topic: String,
    #[serde(default = "default_error_type")]
    pub error_type: String,
    #[serde(default)]
    pub subject: Subject,
}

fn default_error_type() -> String {
    DEFAULT_ERROR_TYPE.to_string()
}

impl NewReviewItem {
    /// Create a new item with the default error type.
    pub fn new(topic: impl Into<String>, subject: Subject) -> Self {
        Self {
            topic: topic.into(),
            error_type: default_error_type(),
            subject,
        }
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = error_type.into();
        self
    }
}

/// Record handed to the store when an item is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItemInit {
    pub topic: String,
    pub error_type: String,
    pub subject: Subject,
    pub state: ScheduleState,
    pub next_review: DateTime<Utc>,
}

/// Fields replaced by a recorded review.
///
/// `expected` is the state the new values were computed from. Stores apply
/// the patch only if the stored state still matches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub state: ScheduleState,
    pub next_review: DateTime<Utc>,
    pub last_review: DateTime<Utc>,
    pub last_quality: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<ScheduleState>,
}

/// Outcome of a recorded review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// The item was rescheduled.
    Scheduled { item: ReviewItem },
    /// The interval reached the cap and the item left the queue.
    Mastered { id: ItemId },
    /// No item with that id; nothing was written.
    NotFound { id: ItemId },
    /// No store available; nothing was written.
    Skipped,
}

/// Topic suggested for practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub topic: String,
    pub subject: Subject,
    pub count: usize,
    /// Cumulative overdue days across the topic's due items.
    pub urgency: f64,
}

/// Queue settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSettings {
    pub recommendation_limit: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            recommendation_limit: crate::recommend::DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}
