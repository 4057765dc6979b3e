//! # Error Handling
//!
//! Error types for the password migration flows, built with `thiserror`.
//!
//! Only fatal conditions are represented here. Unsupported values,
//! already-migrated leaves and a missing access token are diagnostics,
//! not errors, and never reach this type.

use crate::secrets::StoreError;

/// Custom result type for migration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the migration flows
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Document could not be read or written
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Document is not structurally valid YAML
    #[error("Failed to parse YAML from {origin}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Document parsed but its root is not a mapping
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secret store errors outside of a write walk (client construction, reads)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A store write failed and the remaining writes were abandoned
    #[error("Aborted after {written} successful writes: failed to store secret at '{path}'")]
    WriteAborted {
        path: String,
        written: usize,
        #[source]
        source: StoreError,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid document error
    pub fn invalid_document<S: Into<String>>(message: S) -> Self {
        Self::InvalidDocument(message.into())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Config(errors.to_string())
    }
}
