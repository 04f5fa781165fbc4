//! Local SQLite storage for review items.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::SqliteReviewStore;
