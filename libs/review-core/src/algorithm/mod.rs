//! Spaced repetition scheduling.

pub mod sm2;

pub use sm2::Sm2;

use crate::types::ScheduleState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of scheduling an item after review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub state: ScheduleState,
    pub next_review: DateTime<Utc>,
    /// The interval hit the cap; the item should leave the queue.
    pub mastered: bool,
}
