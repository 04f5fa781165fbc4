//! In-process review store.

use super::{Result, ReviewStore};
use crate::error::StoreError;
use crate::types::{ItemId, ItemPatch, ReviewItem, ReviewItemInit, ScheduleState};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    items: Vec<ReviewItem>,
}

/// Review store backed by a vector, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    inner: Mutex<Inner>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items across all profiles.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("review store lock poisoned".to_string()))
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn get_review_queue(&self, profile_id: &str) -> Result<Vec<ReviewItem>> {
        let inner = self.lock()?;
        Ok(inner
            .items
            .iter()
            .filter(|item| item.profile_id == profile_id)
            .cloned()
            .collect())
    }

    fn get_review_item(&self, id: ItemId) -> Result<Option<ReviewItem>> {
        let inner = self.lock()?;
        Ok(inner.items.iter().find(|item| item.id == id).cloned())
    }

    fn add_to_review_queue(&self, profile_id: &str, item: ReviewItemInit) -> Result<ItemId> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = ItemId(inner.next_id);
        inner.items.push(ReviewItem::from_init(id, profile_id, item));
        Ok(id)
    }

    fn update_review_item(&self, id: ItemId, patch: &ItemPatch) -> Result<()> {
        let mut inner = self.lock()?;
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(expected) = &patch.expected {
            if item.schedule_state() != *expected {
                return Err(StoreError::Conflict(id));
            }
        }

        item.apply(patch);
        Ok(())
    }

    fn remove_from_review_queue(&self, id: ItemId) -> Result<()> {
        let mut inner = self.lock()?;
        inner.items.retain(|item| item.id != id);
        Ok(())
    }

    fn evict_review_item(&self, id: ItemId, expected: &ScheduleState) -> Result<()> {
        let mut inner = self.lock()?;
        let position = inner
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if inner.items[position].schedule_state() != *expected {
            return Err(StoreError::Conflict(id));
        }
        inner.items.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScheduleState, Subject};
    use chrono::{Duration, TimeZone, Utc};

    fn init(topic: &str) -> ReviewItemInit {
        ReviewItemInit {
            topic: topic.to_string(),
            error_type: "general".to_string(),
            subject: Subject::Math,
            state: ScheduleState::default(),
            next_review: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    fn patch(expected: Option<ScheduleState>) -> ItemPatch {
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        ItemPatch {
            state: ScheduleState {
                ease_factor: 2.6,
                interval: 1,
                repetitions: 1,
            },
            next_review: at + Duration::days(1),
            last_review: at,
            last_quality: 5,
            expected,
        }
    }

    #[test]
    fn assigns_distinct_ids() {
        let store = InMemoryReviewStore::new();
        let a = store.add_to_review_queue("p1", init("fractions")).unwrap();
        let b = store.add_to_review_queue("p1", init("fractions")).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn queue_is_scoped_to_profile() {
        let store = InMemoryReviewStore::new();
        store.add_to_review_queue("p1", init("fractions")).unwrap();
        store.add_to_review_queue("p2", init("phonics")).unwrap();

        let queue = store.get_review_queue("p1").unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].topic, "fractions");
        assert!(store.get_review_queue("p3").unwrap().is_empty());
    }

    #[test]
    fn update_missing_item_is_not_found() {
        let store = InMemoryReviewStore::new();
        let err = store.update_review_item(ItemId(9), &patch(None)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ItemId(9))));
    }

    #[test]
    fn update_with_stale_state_conflicts() {
        let store = InMemoryReviewStore::new();
        let id = store.add_to_review_queue("p1", init("fractions")).unwrap();

        store
            .update_review_item(id, &patch(Some(ScheduleState::default())))
            .unwrap();
        // Same expectation again: the stored state has moved on.
        let err = store
            .update_review_item(id, &patch(Some(ScheduleState::default())))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let item = store.get_review_item(id).unwrap().unwrap();
        assert_eq!(item.repetitions, 1);
        assert_eq!(item.last_quality, Some(5));
    }

    #[test]
    fn evict_requires_unchanged_state() {
        let store = InMemoryReviewStore::new();
        let id = store.add_to_review_queue("p1", init("fractions")).unwrap();
        store
            .update_review_item(id, &patch(Some(ScheduleState::default())))
            .unwrap();

        let err = store
            .evict_review_item(id, &ScheduleState::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len(), 1);

        let current = store.get_review_item(id).unwrap().unwrap().schedule_state();
        store.evict_review_item(id, &current).unwrap();
        assert!(store.is_empty());

        let err = store.evict_review_item(id, &current).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn len_survives_poisoned_lock() {
        let store = InMemoryReviewStore::new();
        store.add_to_review_queue("p1", init("fractions")).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.inner.lock().unwrap();
            panic!("poison the lock");
        }));
        assert!(result.is_err());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(matches!(
            store.get_review_queue("p1").unwrap_err(),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn remove_is_idempotent() {
        let store = InMemoryReviewStore::new();
        let id = store.add_to_review_queue("p1", init("fractions")).unwrap();
        store.remove_from_review_queue(id).unwrap();
        store.remove_from_review_queue(id).unwrap();
        assert!(store.is_empty());
    }
}
