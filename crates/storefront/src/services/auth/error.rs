//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No account matches the identifier and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The login flags could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
