pub mod commands;
pub mod config;
pub mod db;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use review_core::ReviewQueueManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, Cli};
use crate::db::SqliteReviewStore;
use crate::state::AppState;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    let manager = open_manager(&config);
    let state = AppState::new(manager, config.profile_id);

    let output = commands::dispatch(&state, cli.command)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to render output")?
    );

    Ok(())
}

/// Open the review database. Without one the queue still answers, empty.
pub fn open_manager(config: &AppConfig) -> ReviewQueueManager {
    if let Some(parent) = config.db_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::warn!(
                dir = %parent.display(),
                error = %err,
                "failed to create review database directory"
            );
        }
    }

    match SqliteReviewStore::open(&config.db_path) {
        Ok(store) => {
            tracing::debug!(path = %config.db_path.display(), "opened review database");
            ReviewQueueManager::new(Arc::new(store))
        }
        Err(err) => {
            tracing::warn!(
                path = %config.db_path.display(),
                error = %err,
                "review database unavailable; continuing without review queue"
            );
            ReviewQueueManager::detached()
        }
    }
}
