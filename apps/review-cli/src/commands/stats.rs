//! Recommendation and summary commands.

use crate::state::AppState;
use review_core::{QueueSummary, Recommendation, Result};

/// Most urgent due topics.
pub fn recommendations(state: &AppState, limit: Option<usize>) -> Result<Vec<Recommendation>> {
    state.manager.get_recommendations(&state.profile_id, limit)
}

/// Queue counts for the profile.
pub fn summary(state: &AppState) -> Result<QueueSummary> {
    state.manager.get_summary(&state.profile_id)
}
