//! Urgency ranking of due topics.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::queue::ReviewQueueManager;
use crate::types::{Recommendation, ReviewItem};

/// Number of topics suggested when the caller does not say.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Overdue time in fractional days, zero when not yet due.
pub fn overdue_days(item: &ReviewItem, now: DateTime<Utc>) -> f64 {
    let seconds = (now - item.next_review).num_seconds();
    (seconds as f64 / SECONDS_PER_DAY).max(0.0)
}

/// Group due items by (subject, topic) and rank them.
///
/// Urgency is the sum of overdue days across the group. Higher urgency wins,
/// then the larger group; remaining ties keep first-seen order.
pub fn rank_due_items(items: &[ReviewItem], now: DateTime<Utc>, limit: usize) -> Vec<Recommendation> {
    let mut groups: Vec<Recommendation> = Vec::new();

    for item in items {
        let overdue = overdue_days(item, now);
        match groups
            .iter_mut()
            .find(|g| g.subject == item.subject && g.topic == item.topic)
        {
            Some(group) => {
                group.count += 1;
                group.urgency += overdue;
            }
            None => groups.push(Recommendation {
                topic: item.topic.clone(),
                subject: item.subject,
                count: 1,
                urgency: overdue,
            }),
        }
    }

    groups.sort_by(|a, b| {
        b.urgency
            .total_cmp(&a.urgency)
            .then_with(|| b.count.cmp(&a.count))
    });
    groups.truncate(limit);
    groups
}

impl ReviewQueueManager {
    /// Topics to practice next, most urgent first.
    ///
    /// `limit` falls back to the configured recommendation limit.
    pub fn get_recommendations(
        &self,
        profile_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        let due = self.get_due_items(profile_id)?;
        let limit = limit.unwrap_or(self.settings().recommendation_limit);
        Ok(rank_due_items(&due, self.now(), limit))
    }
}
