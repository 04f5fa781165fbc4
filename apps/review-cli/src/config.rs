//! Command-line and environment configuration.

use clap::{Parser, Subcommand};
use review_core::types::DEFAULT_ERROR_TYPE;
use review_core::{Quality, Subject};
use std::path::PathBuf;

/// Spaced-repetition review queue for missed topics.
#[derive(Debug, Parser)]
#[command(name = "review-queue", version, about)]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "REVIEW_DB_PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Learner profile to operate on.
    #[arg(long, env = "REVIEW_PROFILE", default_value = "default", global = true)]
    pub profile: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Queue a missed topic for review.
    Add {
        topic: String,
        #[arg(long, default_value = DEFAULT_ERROR_TYPE)]
        error_type: String,
        #[arg(long, default_value = "math", value_parser = parse_subject)]
        subject: Subject,
    },
    /// List items due now.
    Due,
    /// List every queued item.
    Queue,
    /// Record a review with quality 0-5.
    Review {
        id: i64,
        #[arg(value_parser = parse_quality, allow_negative_numbers = true)]
        quality: u8,
    },
    /// Rank due topics by urgency.
    Recommend {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Queue counts by subject and topic.
    Summary,
    /// Remove an item from the queue.
    Remove { id: i64 },
}

fn parse_subject(value: &str) -> Result<Subject, String> {
    Subject::from_str(value).ok_or_else(|| {
        let known: Vec<&str> = Subject::ALL.iter().map(Subject::as_str).collect();
        format!("unknown subject '{value}' (expected one of: {})", known.join(", "))
    })
}

fn parse_quality(value: &str) -> Result<u8, String> {
    let raw: i64 = value
        .parse()
        .map_err(|_| format!("quality must be a whole number, got '{value}'"))?;
    u8::try_from(raw)
        .ok()
        .and_then(|q| Quality::new(q).ok())
        .map(|q| q.value())
        .ok_or_else(|| format!("quality must be between 0 and 5, got {raw}"))
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub profile_id: String,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            db_path: cli.db.clone().unwrap_or_else(default_db_path),
            profile_id: cli.profile.clone(),
        }
    }
}

fn default_db_path() -> PathBuf {
    // Use the local data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("review-queue")
        .join("reviews.db")
}
