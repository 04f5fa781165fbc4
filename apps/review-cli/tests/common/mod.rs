//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database and a fixed clock, so
//! tests are independent and deterministic.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use review_cli::db::SqliteReviewStore;
use review_cli::state::AppState;
use review_core::{FixedClock, ReviewItemInit, ReviewQueueManager, ScheduleState, Subject};

pub const PROFILE: &str = "learner-1";

/// Test context with a store, a clock and a manager wired together.
pub struct TestContext {
    pub store: Arc<SqliteReviewStore>,
    pub clock: Arc<FixedClock>,
    pub manager: ReviewQueueManager,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(
            SqliteReviewStore::open_in_memory().expect("Failed to open in-memory database"),
        );
        let clock = Arc::new(FixedClock::new(start()));
        let manager = ReviewQueueManager::new(store.clone()).with_clock(clock.clone());
        Self {
            store,
            clock,
            manager,
        }
    }

    /// Command state bound to the default test profile.
    pub fn app_state(&self) -> AppState {
        AppState::new(self.manager.clone(), PROFILE)
    }
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// Item with default schedule, due `days_overdue` days before `start()`.
pub fn overdue_item(topic: &str, subject: Subject, days_overdue: i64) -> ReviewItemInit {
    ReviewItemInit {
        topic: topic.to_string(),
        error_type: "general".to_string(),
        subject,
        state: ScheduleState::default(),
        next_review: start() - Duration::days(days_overdue),
    }
}

/// Item with an explicit schedule state, due at `start()`.
pub fn item_with_state(topic: &str, ease_factor: f64, interval: u32, repetitions: u32) -> ReviewItemInit {
    ReviewItemInit {
        topic: topic.to_string(),
        error_type: "general".to_string(),
        subject: Subject::Math,
        state: ScheduleState {
            ease_factor,
            interval,
            repetitions,
        },
        next_review: start(),
    }
}
