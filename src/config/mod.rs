//! # Configuration Management
//!
//! One [`MigrationConfig`] is built at startup and passed by reference to
//! every flow. Values come from compiled defaults, the `VAULT_PATH`
//! environment variable (store subdirectory) and CLI overrides applied by
//! the caller.
//!
//! The Vault address is deliberately not read from the environment: the
//! address baked into generated lookup expressions must be the one the
//! operator chose on the command line or the compiled default.

use std::path::PathBuf;

use tracing::info;
use validator::{Validate, ValidationError};

use crate::errors::{Error, Result};
use crate::secrets::{RetryPolicy, SecretString};
use crate::transform::{LookupGenerator, PathLayout, DEFAULT_SUB_DIR};

/// Default location of the Kolla passwords file.
pub const DEFAULT_PASSWORDS_FILE: &str = "etc/kolla/passwords.yml";

/// Default Vault server address.
pub const DEFAULT_VAULT_ADDRESS: &str = "http://127.0.0.1:8200";

/// Default base path, including the KV v2 `data` segment.
pub const DEFAULT_BASE_PATH: &str = "secret/data/kolla";

/// Environment variable selecting the store subdirectory.
pub const VAULT_PATH_ENV: &str = "VAULT_PATH";

/// Environment variable holding the Vault access token.
pub const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";

/// Settings shared by the redact, materialize and verify flows.
#[derive(Debug, Clone, Validate)]
pub struct MigrationConfig {
    /// Passwords document to read (and, for the redactor, rewrite)
    pub passwords_file: PathBuf,

    /// Vault server address, used by the store client and embedded in lookups
    #[validate(custom(function = "validate_vault_address"))]
    pub vault_address: String,

    /// Store base path, e.g. `secret/data/kolla`
    #[validate(custom(function = "validate_base_path"))]
    pub base_path: String,

    /// Store subdirectory appended to the base path
    #[validate(
        length(min = 1, message = "Subdirectory cannot be empty"),
        custom(function = "validate_sub_dir")
    )]
    pub sub_dir: String,

    /// Name of the environment variable holding the access token
    #[validate(length(min = 1, message = "Token variable name cannot be empty"))]
    pub token_env_var: String,

    /// Retry strategy for store writes
    pub retry: RetryPolicy,

    /// Also store leaves that already contain a lookup expression
    pub write_lookup_values: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            passwords_file: PathBuf::from(DEFAULT_PASSWORDS_FILE),
            vault_address: DEFAULT_VAULT_ADDRESS.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            sub_dir: DEFAULT_SUB_DIR.to_string(),
            token_env_var: VAULT_TOKEN_ENV.to_string(),
            retry: RetryPolicy::default(),
            write_lookup_values: false,
        }
    }
}

impl MigrationConfig {
    /// Create configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(VAULT_PATH_ENV).filter(|v| !v.is_empty()) {
            Some(sub_dir) => {
                info!(path = %format!("{}/{}", config.base_path, sub_dir), "Using Vault path");
                config.sub_dir = sub_dir;
            }
            None => {
                info!(
                    path = %format!("{}/{}", config.base_path, DEFAULT_SUB_DIR),
                    "VAULT_PATH is not set, using default Vault path"
                );
            }
        }

        config
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)
    }

    /// Validate, and also require a base path the Vault KV v2 engine can hold.
    ///
    /// Used by the flows that talk to Vault; the redactor only needs [`validate`](Self::validate).
    pub fn validate_for_vault(&self) -> Result<()> {
        self.validate()?;
        validate_kv2_base_path(&self.base_path)
    }

    pub fn path_layout(&self) -> PathLayout {
        PathLayout::new(self.base_path.clone(), self.sub_dir.clone())
    }

    pub fn lookup_generator(&self) -> LookupGenerator {
        LookupGenerator::new(self.vault_address.clone(), self.token_env_var.clone())
    }

    /// Read the access token from the configured environment variable.
    ///
    /// Unset and empty are both treated as missing.
    pub fn resolve_token(&self) -> Option<SecretString> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_token_with<F>(&self, lookup: F) -> Option<SecretString>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.token_env_var).filter(|t| !t.is_empty()).map(SecretString::new)
    }
}

fn validate_vault_address(address: &str) -> std::result::Result<(), ValidationError> {
    let valid = ["http://", "https://"]
        .iter()
        .any(|scheme| address.strip_prefix(scheme).is_some_and(|host| !host.is_empty()));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("vault_address")
            .with_message("Vault address must be an http:// or https:// URL".into()))
    }
}

fn validate_base_path(base_path: &str) -> std::result::Result<(), ValidationError> {
    if base_path.is_empty() || base_path.starts_with('/') || base_path.ends_with('/') {
        return Err(ValidationError::new("base_path")
            .with_message("Base path must be non-empty without leading or trailing '/'".into()));
    }
    Ok(())
}

fn validate_sub_dir(sub_dir: &str) -> std::result::Result<(), ValidationError> {
    if sub_dir.starts_with('/') || sub_dir.ends_with('/') {
        return Err(ValidationError::new("sub_dir")
            .with_message("Subdirectory must not start or end with '/'".into()));
    }
    Ok(())
}

/// Every derived path must split into `<mount>/data/<path>`.
fn validate_kv2_base_path(base_path: &str) -> Result<()> {
    match format!("{}/", base_path).split_once("/data/") {
        Some((mount, _)) if !mount.is_empty() => Ok(()),
        _ => Err(Error::config(format!(
            "Base path '{}' has no KV v2 '/data' segment (expected e.g. 'secret/data/kolla')",
            base_path
        ))),
    }
}
