//! Client storage error types

use thiserror::Error;

/// Errors that can occur while reading or writing durable client state
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot names are restricted to ASCII alphanumerics, `-` and `_`
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reject keys that could escape the storage directory or collide on disk
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
