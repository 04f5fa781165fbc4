//! Queue maintenance commands.

use crate::state::AppState;
use review_core::{ItemId, NewReviewItem, Result, ReviewItem, Subject};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AddResult {
    /// `None` when storage was unavailable and nothing was queued.
    pub id: Option<ItemId>,
    pub topic: String,
}

/// Queue a missed topic.
pub fn add_topic(
    state: &AppState,
    topic: String,
    error_type: String,
    subject: Subject,
) -> Result<AddResult> {
    let item = NewReviewItem::new(topic.clone(), subject).with_error_type(error_type);
    let id = state.manager.add_to_queue(&state.profile_id, item)?;
    Ok(AddResult { id, topic })
}

/// Items due now.
pub fn due_items(state: &AppState) -> Result<Vec<ReviewItem>> {
    state.manager.get_due_items(&state.profile_id)
}

/// Every queued item of the profile.
pub fn list_queue(state: &AppState) -> Result<Vec<ReviewItem>> {
    state.manager.get_queue(&state.profile_id)
}

#[derive(Debug, Serialize)]
pub struct RemoveResult {
    pub removed: ItemId,
}

/// Remove an item. Unknown ids succeed.
pub fn remove_item(state: &AppState, id: i64) -> Result<RemoveResult> {
    let id = ItemId(id);
    state.manager.remove_item(id)?;
    Ok(RemoveResult { removed: id })
}
