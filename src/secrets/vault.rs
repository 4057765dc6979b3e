//! HashiCorp Vault secret store.
//!
//! Writes go through the KV v2 secrets engine. Secret paths are expected in
//! the full API form, `<mount>/data/<path>` (for example
//! `secret/data/kolla/default/db_password`), which is also what the Ansible
//! `hashi_vault` lookup consumes. The store splits that form back into the
//! mount and the path inside it for `vaultrs`.
//!
//! The stored secret body is `{"value": "<literal>"}`.

use async_trait::async_trait;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::error::{Result, StoreError};
use super::store::SecretStore;
use super::types::{SecretPayload, SecretString};
use crate::transform::SecretPath;

/// Segment separating the KV v2 mount from the secret path.
const KV2_DATA_SEGMENT: &str = "/data/";

/// Vault-backed [`SecretStore`] using token authentication.
pub struct VaultSecretStore {
    client: VaultClient,
    address: String,
}

impl VaultSecretStore {
    /// Creates a client for the Vault server at `address`.
    ///
    /// No request is sent; an unreachable server surfaces on the first write.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ClientBuild`] if the address is empty or the client cannot be built
    pub fn new(address: &str, token: &SecretString) -> Result<Self> {
        if address.is_empty() {
            return Err(StoreError::client_build("Vault address cannot be empty"));
        }

        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(address);
        settings_builder.token(token.expose_secret());

        let settings = settings_builder
            .build()
            .map_err(|e| StoreError::client_build(format!("Invalid Vault configuration: {}", e)))?;

        let client = VaultClient::new(settings)
            .map_err(|e| StoreError::client_build(format!("Failed to create Vault client: {}", e)))?;

        tracing::debug!(address = %address, "Created Vault client");
        Ok(Self { client, address: address.to_string() })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Split `<mount>/data/<path>` into `(mount, path)`.
pub fn split_kv2_path(path: &SecretPath) -> Result<(&str, &str)> {
    let raw = path.as_str();
    match raw.split_once(KV2_DATA_SEGMENT) {
        Some((mount, rest)) if !mount.is_empty() && !rest.is_empty() => Ok((mount, rest)),
        _ => Err(StoreError::invalid_path(
            raw,
            "expected '<mount>/data/<path>' for the KV v2 secrets engine",
        )),
    }
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn write_secret(&self, path: &SecretPath, payload: &SecretPayload) -> Result<()> {
        let (mount, key) = split_kv2_path(path)?;

        kv2::set(&self.client, mount, key, payload).await.map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to write secret to Vault");
            StoreError::write_rejected(path.as_str(), e.to_string())
        })?;

        tracing::info!(path = %path, "Stored secret in Vault");
        Ok(())
    }

    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretPayload>> {
        let (mount, key) = split_kv2_path(path)?;

        match kv2::read::<SecretPayload>(&self.client, mount, key).await {
            Ok(payload) => Ok(Some(payload)),
            Err(ClientError::APIError { code: 404, .. }) => Ok(None),
            Err(e) => {
                tracing::error!(error = %e, path = %path, "Failed to read secret from Vault");
                Err(StoreError::read_failed(path.as_str(), e.to_string()))
            }
        }
    }
}
