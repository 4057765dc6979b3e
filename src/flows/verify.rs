//! Verify flow: compare the store against the document.
//!
//! Reads back every path the materializer would write and reports which
//! entries are missing or hold a different value. Values are compared in
//! memory and never logged.

use tracing::{info, warn};

use super::materialize::plan_writes;
use super::{connect_store, FlowOutcome};
use crate::config::MigrationConfig;
use crate::document::{load_document, Document};
use crate::errors::Result;
use crate::secrets::SecretStore;
use crate::transform::SecretPath;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub matched: usize,
    pub missing: Vec<SecretPath>,
    pub mismatched: Vec<SecretPath>,
}

impl VerifyReport {
    /// True when every leaf is present in the store with the same value.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

/// Check each planned leaf of `document` against `store`.
///
/// A read error aborts the check; absence is reported, not raised.
pub async fn verify(
    document: &Document,
    config: &MigrationConfig,
    store: &dyn SecretStore,
) -> Result<VerifyReport> {
    let plan = plan_writes(document, config);
    let mut report = VerifyReport::default();

    for pending in &plan.writes {
        match store.read_secret(&pending.path).await? {
            Some(stored) if stored.value == pending.value.expose_secret() => report.matched += 1,
            Some(_) => {
                warn!(path = %pending.path, "Stored secret differs from the document");
                report.mismatched.push(pending.path.clone());
            }
            None => {
                warn!(path = %pending.path, "Secret missing from Vault");
                report.missing.push(pending.path.clone());
            }
        }
    }

    info!(
        matched = report.matched,
        missing = report.missing.len(),
        mismatched = report.mismatched.len(),
        "Verification finished"
    );
    Ok(report)
}

/// Run the whole verify flow against the configured file and Vault.
pub async fn run_verifier(
    config: &MigrationConfig,
    require_token: bool,
) -> Result<FlowOutcome<VerifyReport>> {
    let store = match connect_store(config, require_token)? {
        FlowOutcome::Completed(store) => store,
        FlowOutcome::MissingToken => return Ok(FlowOutcome::MissingToken),
    };

    let document = load_document(&config.passwords_file)?;
    let report = verify(&document, config, &store).await?;
    Ok(FlowOutcome::Completed(report))
}
