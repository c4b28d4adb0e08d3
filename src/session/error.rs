//! Auth flow error types

use crate::api::ApiError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by session manager flows without recovery semantics
#[derive(Error, Debug)]
pub enum AuthError {
    /// The remote call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The credential could not be persisted
    #[error("Failed to persist credential: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// HTTP status of the underlying failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Api(e) => e.status(),
            AuthError::Storage(_) => None,
        }
    }

    /// Server-provided detail of the underlying failure, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            AuthError::Api(e) => e.detail(),
            AuthError::Storage(_) => None,
        }
    }

    /// Message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.user_message(),
            AuthError::Storage(e) => e.to_string(),
        }
    }
}

/// Result type for auth flows
pub type AuthResult<T> = Result<T, AuthError>;
