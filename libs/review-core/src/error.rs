//! Error types for review-core.

use thiserror::Error;

use crate::types::ItemId;

/// Result type alias using ReviewError.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors surfaced by a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("review item not found: {0}")]
    NotFound(ItemId),

    #[error("review item {0} was modified concurrently")]
    Conflict(ItemId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap any backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Errors returned by queue operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_quality() {
        let error = ReviewError::InvalidQuality(7);
        assert_eq!(error.to_string(), "quality must be between 0 and 5, got 7");
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let error = ReviewError::from(StoreError::NotFound(ItemId(42)));
        assert_eq!(error.to_string(), "review item not found: 42");
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = StoreError::backend(io);
        assert_eq!(error.to_string(), "storage error: disk full");
        assert!(std::error::Error::source(&error).is_some());
    }
}
