//! Core secret store trait.

use async_trait::async_trait;

use super::error::Result;
use super::types::SecretPayload;
use crate::transform::SecretPath;

/// A hierarchical store holding one [`SecretPayload`] per path.
///
/// Implementations must not log payload values.
///
/// ```rust,ignore
/// use kolla_vault::secrets::{SecretPayload, SecretStore, VaultSecretStore};
///
/// let store = VaultSecretStore::new("http://127.0.0.1:8200", &token)?;
/// store.write_secret(&path, &SecretPayload::new("s3cret")).await?;
/// let stored = store.read_secret(&path).await?;
/// ```
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Store `payload` at `path`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// - [`StoreError::WriteRejected`](super::StoreError::WriteRejected) if the store refuses the request
    /// - [`StoreError::InvalidPath`](super::StoreError::InvalidPath) if `path` does not fit the store layout
    async fn write_secret(&self, path: &SecretPath, payload: &SecretPayload) -> Result<()>;

    /// Fetch the payload at `path`, or `None` if nothing is stored there.
    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretPayload>>;
}
