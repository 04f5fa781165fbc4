//! Queue counts for dashboards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::queue::ReviewQueueManager;
use crate::types::{ReviewItem, Subject};

/// Snapshot counts of a profile's review queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub due_count: usize,
    pub total_in_queue: usize,
    pub by_subject: BTreeMap<Subject, usize>,
    pub by_topic: BTreeMap<String, usize>,
}

impl QueueSummary {
    /// Count a queue snapshot. Every known subject is present, zero or not.
    pub fn from_items(items: &[ReviewItem], now: DateTime<Utc>) -> Self {
        let mut by_subject: BTreeMap<Subject, usize> =
            Subject::ALL.iter().map(|subject| (*subject, 0)).collect();
        let mut by_topic = BTreeMap::new();

        for item in items {
            *by_subject.entry(item.subject).or_insert(0) += 1;
            *by_topic.entry(item.topic.clone()).or_insert(0) += 1;
        }

        Self {
            due_count: items.iter().filter(|item| item.is_due(now)).count(),
            total_in_queue: items.len(),
            by_subject,
            by_topic,
        }
    }
}

impl ReviewQueueManager {
    /// Summary built from a single read of the queue.
    pub fn get_summary(&self, profile_id: &str) -> Result<QueueSummary> {
        let items = self.get_queue(profile_id)?;
        Ok(QueueSummary::from_items(&items, self.now()))
    }
}
