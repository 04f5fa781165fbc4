//! Review scheduling engine for missed topics.
//!
//! Provides:
//! - SM-2 scheduling of review items on a 0-5 quality scale
//! - A queue manager over a pluggable storage collaborator
//! - Urgency-ranked practice recommendations
//! - Queue summaries for dashboards
//! - An in-memory store and an injectable clock

pub mod algorithm;
pub mod clock;
pub mod error;
pub mod queue;
pub mod recommend;
pub mod store;
pub mod summary;
pub mod types;

pub use algorithm::{ScheduleResult, Sm2};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, ReviewError, StoreError};
pub use queue::ReviewQueueManager;
pub use recommend::{rank_due_items, DEFAULT_RECOMMENDATION_LIMIT};
pub use store::{InMemoryReviewStore, ReviewStore};
pub use summary::QueueSummary;
pub use types::{
    ItemId, ItemPatch, NewReviewItem, Quality, QueueSettings, Recommendation, ReviewItem,
    ReviewItemInit, ReviewOutcome, ScheduleState, Subject,
};
