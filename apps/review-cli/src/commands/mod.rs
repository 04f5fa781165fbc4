//! Command handlers behind the `review-queue` binary.

pub mod queue;
pub mod review;
pub mod stats;

pub use queue::{add_topic, due_items, list_queue, remove_item, AddResult, RemoveResult};
pub use review::submit_review;
pub use stats::{recommendations, summary};

use crate::config::Command;
use crate::state::AppState;
use serde::Serialize;
use serde_json::Value;

/// Run one command and return its JSON output.
pub fn dispatch(state: &AppState, command: Command) -> anyhow::Result<Value> {
    let output = match command {
        Command::Add {
            topic,
            error_type,
            subject,
        } => to_json(add_topic(state, topic, error_type, subject)?)?,
        Command::Due => to_json(due_items(state)?)?,
        Command::Queue => to_json(list_queue(state)?)?,
        Command::Review { id, quality } => to_json(submit_review(state, id, quality)?)?,
        Command::Recommend { limit } => to_json(recommendations(state, limit)?)?,
        Command::Summary => to_json(summary(state)?)?,
        Command::Remove { id } => to_json(remove_item(state, id)?)?,
    };
    Ok(output)
}

fn to_json<T: Serialize>(value: T) -> serde_json::Result<Value> {
    serde_json::to_value(value)
}
