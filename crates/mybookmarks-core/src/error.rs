//! Error types for mybookmarks.

use thiserror::Error;

use crate::models::CategoryId;

/// Result type alias using mybookmarks' Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mybookmarks operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert or rename collided with the per-owner unique name constraint
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    /// Category not found for the requesting owner
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error means the storage layer could not hand out a
    /// connection at all, as opposed to a failed statement.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Database(sqlx::Error::PoolTimedOut) | Error::Database(sqlx::Error::PoolClosed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_duplicate_category() {
        let err = Error::DuplicateCategory("Work".to_string());
        assert_eq!(err.to_string(), "Duplicate category: Work");
    }

    #[test]
    fn test_error_display_category_not_found() {
        let err = Error::CategoryNotFound(42);
        assert_eq!(err.to_string(), "Category not found: 42");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing DATABASE_URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing DATABASE_URL");
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(Error::Database(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(Error::Database(sqlx::Error::PoolClosed).is_unavailable());
        assert!(!Error::Database(sqlx::Error::RowNotFound).is_unavailable());
        assert!(!Error::CategoryNotFound(1).is_unavailable());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        match err {
            Error::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
