//! Store error type shared by every store implementation

use thiserror::Error;

/// Failure of a single-key store operation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert hit an existing key
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Store task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Map SQLite unique/primary-key violations to `DuplicateKey`
    pub fn from_insert(err: rusqlite::Error, key: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::DuplicateKey(key.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
