//! Review queue orchestration.
//!
//! `ReviewQueueManager` ties the SM-2 scheduler to a storage collaborator.
//! It holds no state of its own beyond its injected dependencies, so any
//! number of managers can share one store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::algorithm::Sm2;
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StoreError};
use crate::store::ReviewStore;
use crate::types::{
    ItemId, ItemPatch, NewReviewItem, Quality, QueueSettings, ReviewItem, ReviewItemInit,
    ReviewOutcome,
};

/// Schedules reviews for missed topics on top of a `ReviewStore`.
#[derive(Clone)]
pub struct ReviewQueueManager {
    store: Option<Arc<dyn ReviewStore>>,
    clock: Arc<dyn Clock>,
    sm2: Sm2,
    settings: QueueSettings,
}

impl ReviewQueueManager {
    /// Manager over `store` using the wall clock and default parameters.
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self {
            store: Some(store),
            clock: Arc::new(SystemClock),
            sm2: Sm2::default(),
            settings: QueueSettings::default(),
        }
    }

    /// Manager with no store. Reads come back empty and writes are skipped.
    pub fn detached() -> Self {
        Self {
            store: None,
            clock: Arc::new(SystemClock),
            sm2: Sm2::default(),
            settings: QueueSettings::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_scheduler(mut self, sm2: Sm2) -> Self {
        self.sm2 = sm2;
        self
    }

    pub fn with_settings(mut self, settings: QueueSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Current reading of the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Queue a newly missed topic, due immediately.
    ///
    /// Returns `None` when no store is available. Repeated calls for the same
    /// topic create independent items.
    pub fn add_to_queue(&self, profile_id: &str, item: NewReviewItem) -> Result<Option<ItemId>> {
        let Some(store) = self.store("add_to_queue") else {
            return Ok(None);
        };

        let init = ReviewItemInit {
            topic: item.topic,
            error_type: item.error_type,
            subject: item.subject,
            state: self.sm2.initial_state(),
            next_review: self.clock.now(),
        };
        let topic = init.topic.clone();

        let id = degrade("add_to_queue", store.add_to_review_queue(profile_id, init).map(Some))?;
        if let Some(id) = id {
            debug!(profile_id, %id, topic = %topic, "queued review item");
        }
        Ok(id)
    }

    /// Full snapshot of a profile's active items.
    pub fn get_queue(&self, profile_id: &str) -> Result<Vec<ReviewItem>> {
        let Some(store) = self.store("get_queue") else {
            return Ok(Vec::new());
        };
        degrade("get_queue", store.get_review_queue(profile_id))
    }

    /// Items whose review time has passed, in store order.
    pub fn get_due_items(&self, profile_id: &str) -> Result<Vec<ReviewItem>> {
        let Some(store) = self.store("get_due_items") else {
            return Ok(Vec::new());
        };
        let now = self.clock.now();
        degrade("get_due_items", store.get_due_reviews(profile_id, now))
    }

    /// Apply a review of `quality` (0-5) to an item.
    ///
    /// Quality is validated before storage is touched. A missing item is a
    /// no-op. An item whose interval reaches the cap is removed instead of
    /// rescheduled.
    pub fn record_review(&self, id: ItemId, quality: u8) -> Result<ReviewOutcome> {
        let quality = Quality::new(quality)?;
        let Some(store) = self.store("record_review") else {
            return Ok(ReviewOutcome::Skipped);
        };

        let mut item = match store.get_review_item(id) {
            Ok(Some(item)) => item,
            Ok(None) => {
                debug!(%id, "review recorded for unknown item; ignoring");
                return Ok(ReviewOutcome::NotFound { id });
            }
            Err(err) => return skip_if_unavailable("record_review", err),
        };

        let now = self.clock.now();
        let previous = item.schedule_state();
        let result = self.sm2.compute_next(&previous, quality, now);

        if result.mastered {
            match store.evict_review_item(id, &previous) {
                Ok(()) => {}
                Err(StoreError::NotFound(_)) => {
                    debug!(%id, "item removed before mastery was saved; ignoring");
                    return Ok(ReviewOutcome::NotFound { id });
                }
                Err(err) => return skip_if_unavailable("record_review", err),
            }
            info!(%id, topic = %item.topic, "item mastered; removed from review queue");
            return Ok(ReviewOutcome::Mastered { id });
        }

        let patch = ItemPatch {
            state: result.state,
            next_review: result.next_review,
            last_review: now,
            last_quality: quality.value(),
            expected: Some(previous),
        };

        match store.update_review_item(id, &patch) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                debug!(%id, "item removed before review was saved; ignoring");
                return Ok(ReviewOutcome::NotFound { id });
            }
            Err(err) => return skip_if_unavailable("record_review", err),
        }

        item.apply(&patch);
        debug!(
            %id,
            quality = quality.value(),
            interval = item.interval,
            ease_factor = item.ease_factor,
            "review scheduled"
        );
        Ok(ReviewOutcome::Scheduled { item })
    }

    /// Drop an item from the queue. Unknown ids are ignored.
    pub fn remove_item(&self, id: ItemId) -> Result<()> {
        let Some(store) = self.store("remove_item") else {
            return Ok(());
        };
        degrade("remove_item", store.remove_from_review_queue(id))
    }

    fn store(&self, operation: &'static str) -> Option<&dyn ReviewStore> {
        if self.store.is_none() {
            warn!(operation, "no review store configured; skipping");
        }
        self.store.as_deref()
    }
}

/// Treat an unavailable store as an empty result; propagate everything else.
fn degrade<T: Default>(operation: &'static str, result: std::result::Result<T, StoreError>) -> Result<T> {
    match result {
        Err(StoreError::Unavailable(reason)) => {
            warn!(operation, %reason, "review store unavailable; skipping");
            Ok(T::default())
        }
        other => other.map_err(Into::into),
    }
}

fn skip_if_unavailable(operation: &'static str, err: StoreError) -> Result<ReviewOutcome> {
    match err {
        StoreError::Unavailable(reason) => {
            warn!(operation, %reason, "review store unavailable; skipping");
            Ok(ReviewOutcome::Skipped)
        }
        err => Err(err.into()),
    }
}
