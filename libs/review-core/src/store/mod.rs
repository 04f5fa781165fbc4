//! Storage collaborator interface.

pub mod memory;

pub use memory::InMemoryReviewStore;

use crate::error::StoreError;
use crate::types::{ItemId, ItemPatch, ReviewItem, ReviewItemInit, ScheduleState};
use chrono::{DateTime, Utc};

type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for review items.
///
/// Implementations own id assignment and must honor `ItemPatch::expected`
/// as a compare-and-swap guard.
pub trait ReviewStore: Send + Sync {
    /// All active items of a profile, in store order.
    fn get_review_queue(&self, profile_id: &str) -> Result<Vec<ReviewItem>>;

    /// Items of a profile with `next_review <= now`.
    fn get_due_reviews(&self, profile_id: &str, now: DateTime<Utc>) -> Result<Vec<ReviewItem>> {
        Ok(self
            .get_review_queue(profile_id)?
            .into_iter()
            .filter(|item| item.is_due(now))
            .collect())
    }

    fn get_review_item(&self, id: ItemId) -> Result<Option<ReviewItem>>;

    fn add_to_review_queue(&self, profile_id: &str, item: ReviewItemInit) -> Result<ItemId>;

    /// Fails with `NotFound` when `id` is absent and `Conflict` when the
    /// stored state no longer matches `patch.expected`.
    fn update_review_item(&self, id: ItemId, patch: &ItemPatch) -> Result<()>;

    /// Removing an absent id is not an error.
    fn remove_from_review_queue(&self, id: ItemId) -> Result<()>;

    /// Remove an item only while its stored state still equals `expected`.
    ///
    /// Fails with `NotFound` when `id` is absent and `Conflict` when the
    /// state has changed since it was read.
    fn evict_review_item(&self, id: ItemId, expected: &ScheduleState) -> Result<()>;
}

impl<S: ReviewStore + ?Sized> ReviewStore for std::sync::Arc<S> {
    fn get_review_queue(&self, profile_id: &str) -> Result<Vec<ReviewItem>> {
        (**self).get_review_queue(profile_id)
    }

    fn get_due_reviews(&self, profile_id: &str, now: DateTime<Utc>) -> Result<Vec<ReviewItem>> {
        (**self).get_due_reviews(profile_id, now)
    }

    fn get_review_item(&self, id: ItemId) -> Result<Option<ReviewItem>> {
        (**self).get_review_item(id)
    }

    fn add_to_review_queue(&self, profile_id: &str, item: ReviewItemInit) -> Result<ItemId> {
        (**self).add_to_review_queue(profile_id, item)
    }

    fn update_review_item(&self, id: ItemId, patch: &ItemPatch) -> Result<()> {
        (**self).update_review_item(id, patch)
    }

    fn remove_from_review_queue(&self, id: ItemId) -> Result<()> {
        (**self).remove_from_review_queue(id)
    }

    fn evict_review_item(&self, id: ItemId, expected: &ScheduleState) -> Result<()> {
        (**self).evict_review_item(id, expected)
    }
}
