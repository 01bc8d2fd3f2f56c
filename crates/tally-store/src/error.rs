//! Error types for the score store.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by score store operations.
///
/// `Validation` and `Duplicate` carry client-facing messages and map to
/// 400 responses at the HTTP boundary. `Storage` wraps any database
/// failure; its detail is logged server-side and never sent to clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl StoreError {
    /// Classifies a database error from an insert, turning a unique
    /// constraint violation into `Duplicate` with the given message.
    pub(crate) fn from_insert(e: sqlx::Error, duplicate_msg: &str) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() || db.message().to_ascii_lowercase().contains("unique") {
                return StoreError::Duplicate(duplicate_msg.to_string());
            }
        }
        e.into()
    }
}
