//! Ansible lookup expressions for Vault-backed secrets.
//!
//! The redactor replaces each literal with a Jinja expression that makes
//! Ansible fetch the value from Vault at deploy time:
//!
//! ```text
//! {{ lookup('community.general.hashi_vault', '<path>', 'url=<address>', token=lookup('env', 'VAULT_TOKEN')) }}
//! ```
//!
//! The token is referenced through the deploy host's environment and never
//! embedded. Every expression contains
//! [`LOOKUP_MARKER`](super::classify::LOOKUP_MARKER) so later runs
//! recognise it as migrated.

use super::path::SecretPath;

/// Name of the Ansible lookup plugin that resolves the expression.
pub const LOOKUP_PLUGIN: &str = "community.general.hashi_vault";

/// Builds lookup expressions for one Vault server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupGenerator {
    vault_address: String,
    token_env_var: String,
}

impl LookupGenerator {
    pub fn new(vault_address: impl Into<String>, token_env_var: impl Into<String>) -> Self {
        Self { vault_address: vault_address.into(), token_env_var: token_env_var.into() }
    }

    /// Expression that resolves to the secret stored at `path`.
    pub fn generate(&self, path: &SecretPath) -> String {
        format!(
            "{{{{ lookup('{}', '{}', 'url={}', token=lookup('env', '{}')) }}}}",
            LOOKUP_PLUGIN, path, self.vault_address, self.token_env_var
        )
    }
}
