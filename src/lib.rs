//! # Kolla Vault
//!
//! Migrates the secrets of a Kolla-Ansible `passwords.yml` into HashiCorp
//! Vault. Two flows share one tree walk over the document:
//!
//! ```text
//! redact:      literal leaf -> lookup('community.general.hashi_vault', '<path>', ...)
//! materialize: literal leaf -> Vault KV v2 write {"value": <literal>} at <path>
//! ```
//!
//! The path of every leaf is `<base_path>/<sub_dir>/<ancestor keys...>/<leaf key>`,
//! so both flows always agree on where a secret lives.
//!
//! ## Example Usage
//!
//! ```rust
//! use kolla_vault::{document::Document, flows::redact, MigrationConfig};
//!
//! let mut document = Document::from_yaml_str("database_password: s3cr3t\n").unwrap();
//! let report = redact(&mut document, &MigrationConfig::default());
//!
//! assert_eq!(report.replaced, 1);
//! assert!(document.to_yaml().contains("secret/data/kolla/default/database_password"));
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod errors;
pub mod flows;
pub mod observability;
pub mod secrets;
pub mod transform;

// Re-export commonly used types and traits
pub use config::MigrationConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
