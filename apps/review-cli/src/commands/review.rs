//! Review submission command.

use crate::state::AppState;
use review_core::{ItemId, Result, ReviewOutcome};
use tracing::info;

/// Record a review of `quality` (0-5) for an item.
pub fn submit_review(state: &AppState, id: i64, quality: u8) -> Result<ReviewOutcome> {
    let outcome = state.manager.record_review(ItemId(id), quality)?;
    if let ReviewOutcome::Scheduled { item } = &outcome {
        info!(
            id,
            topic = %item.topic,
            next_review = %item.next_review,
            "next review scheduled"
        );
    }
    Ok(outcome)
}
