//! Error types for secret store operations.

use thiserror::Error;

/// Result type for secret store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the secret store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store client could not be constructed.
    #[error("Failed to create secret store client: {message}")]
    ClientBuild { message: String },

    /// The secret path cannot be mapped onto the store's layout.
    #[error("Invalid secret path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The store rejected a write request.
    #[error("Write rejected at '{path}': {message}")]
    WriteRejected { path: String, message: String },

    /// A read request failed for a reason other than the secret being absent.
    #[error("Read failed at '{path}': {message}")]
    ReadFailed { path: String, message: String },
}

impl StoreError {
    /// Create a client construction error.
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild { message: message.into() }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into(), reason: reason.into() }
    }

    /// Create a write rejected error.
    pub fn write_rejected(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteRejected { path: path.into(), message: message.into() }
    }

    /// Create a read failed error.
    pub fn read_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed { path: path.into(), message: message.into() }
    }

    /// Whether another attempt at the same request could succeed.
    ///
    /// Path and client errors are deterministic and never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteRejected { .. } | Self::ReadFailed { .. })
    }
}
