//! # Flow Drivers
//!
//! The entry flows built on the shared tree walker:
//!
//! ```text
//! redact:      passwords.yml -> walker -> lookup generator -> serializer -> passwords.yml
//! materialize: passwords.yml -> walker -> secret store writer -> Vault
//! verify:      passwords.yml -> walker -> secret store reads -> report
//! ```

pub mod materialize;
pub mod redact;
pub mod verify;

pub use materialize::{
    materialize, plan_writes, run_materializer, MaterializeOptions, MaterializeOutcome,
    MaterializeSummary, PendingWrite, WritePlan,
};
pub use redact::{redact, run_redactor, RedactTarget};
pub use verify::{run_verifier, verify, VerifyReport};

use tracing::warn;

use crate::config::MigrationConfig;
use crate::errors::{Error, Result};
use crate::secrets::VaultSecretStore;

/// Result of a flow that needs an access token.
#[derive(Debug)]
pub enum FlowOutcome<T> {
    Completed(T),
    /// No token was available; nothing was done.
    MissingToken,
}

/// Build the Vault store from the configured token.
///
/// A missing token is a clean early exit unless `require_token` is set.
pub(crate) fn connect_store(
    config: &MigrationConfig,
    require_token: bool,
) -> Result<FlowOutcome<VaultSecretStore>> {
    let Some(token) = config.resolve_token() else {
        if require_token {
            return Err(Error::config(format!("{} is not set", config.token_env_var)));
        }
        warn!(variable = %config.token_env_var, "Vault token is not set, exiting without changes");
        return Ok(FlowOutcome::MissingToken);
    };

    Ok(FlowOutcome::Completed(VaultSecretStore::new(&config.vault_address, &token)?))
}
