//! Secret store abstraction for the materializer and verifier.
//!
//! The flows only need two operations from a store: write a value at a path
//! and read it back. [`SecretStore`] captures that; [`VaultSecretStore`] is
//! the HashiCorp Vault KV v2 implementation, and [`SecretStoreWriter`]
//! layers the retry policy on top for the materializer.
//!
//! # Security Considerations
//!
//! - Secret values and the access token are never logged or put in errors
//! - Values are held in [`SecretString`] until they are sent
//! - The token comes from the environment at run time, never from the document

pub mod error;
pub mod retry;
pub mod store;
pub mod types;
pub mod vault;
pub mod writer;

// Re-export main types
pub use error::{Result, StoreError};
pub use retry::RetryPolicy;
pub use store::SecretStore;
pub use types::{SecretPayload, SecretString};
pub use vault::{split_kv2_path, VaultSecretStore};
pub use writer::SecretStoreWriter;
