//! Database error types.

use review_core::{ItemId, StoreError};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("review item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("review item {0} was modified concurrently")]
    Conflict(ItemId),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("database connection lock poisoned")]
    LockPoisoned,
}

impl DbError {
    /// Whether the database could not be reached at all, as opposed to a
    /// failed statement.
    fn is_unavailable(&self) -> bool {
        match self {
            Self::LockPoisoned => true,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ItemNotFound(id) => StoreError::NotFound(id),
            DbError::Conflict(id) => StoreError::Conflict(id),
            err if err.is_unavailable() => StoreError::Unavailable(err.to_string()),
            err => StoreError::backend(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_store_not_found() {
        let err: StoreError = DbError::ItemNotFound(ItemId(5)).into();
        assert!(matches!(err, StoreError::NotFound(ItemId(5))));
    }

    #[test]
    fn busy_database_is_unavailable() {
        let sqlite = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let err: StoreError = DbError::Sqlite(sqlite).into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn invalid_rows_are_backend_errors() {
        let err: StoreError = DbError::InvalidData("subject 'art'".into()).into();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(err.to_string(), "storage error: invalid data: subject 'art'");
    }
}
