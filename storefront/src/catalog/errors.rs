//! Catalog error types.

use std::time::Duration;

use thiserror::Error;

use crate::db::timeouts::TimeoutError;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Search was called without a query
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store operation exceeded the query timeout
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<TimeoutError> for CatalogError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => CatalogError::Timeout(duration),
            TimeoutError::Database(e) => CatalogError::Database(e),
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
