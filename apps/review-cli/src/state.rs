//! Application state.

use review_core::ReviewQueueManager;

/// State shared by every command of one invocation.
pub struct AppState {
    pub manager: ReviewQueueManager,
    pub profile_id: String,
}

impl AppState {
    pub fn new(manager: ReviewQueueManager, profile_id: impl Into<String>) -> Self {
        Self {
            manager,
            profile_id: profile_id.into(),
        }
    }
}
