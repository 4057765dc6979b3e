//! Materializer flow: store every literal password in Vault.
//!
//! The walk collects one pending write per eligible leaf, in traversal
//! order; the writes are then issued one at a time. The first rejected write
//! aborts the run: no later write is attempted and the error names the
//! failing path. A partially populated store is not left behind silently.

use tracing::{info, warn};

use super::{connect_store, FlowOutcome};
use crate::config::MigrationConfig;
use crate::document::{load_document, Document};
use crate::errors::{Error, Result};
use crate::secrets::{SecretStore, SecretStoreWriter, SecretString};
use crate::transform::{NodeClass, SecretPath, TreeWalker, WalkReport};

/// One literal waiting to be stored.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub path: SecretPath,
    pub value: SecretString,
}

/// Every write a materializer run would perform.
#[derive(Debug, Clone, Default)]
pub struct WritePlan {
    pub writes: Vec<PendingWrite>,
    pub report: WalkReport,
}

impl WritePlan {
    pub fn paths(&self) -> Vec<SecretPath> {
        self.writes.iter().map(|w| w.path.clone()).collect()
    }
}

/// Result of a completed materializer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub written: usize,
    pub report: WalkReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Plan only: list the paths, touch neither the token nor the store.
    pub dry_run: bool,
    /// Treat a missing token as an error instead of a clean exit.
    pub require_token: bool,
}

/// Outcome of [`run_materializer`].
#[derive(Debug)]
pub enum MaterializeOutcome {
    Completed(MaterializeSummary),
    DryRun(WritePlan),
    MissingToken,
}

/// Collect the writes for `document` without touching any store.
///
/// Leaves holding a lookup expression are only included when
/// `config.write_lookup_values` is set.
pub fn plan_writes(document: &Document, config: &MigrationConfig) -> WritePlan {
    let walker = TreeWalker::new(config.path_layout()).visit_transformed(config.write_lookup_values);
    let mut writes = Vec::new();

    let report = walker
        .inspect(document.root(), |leaf| {
            if leaf.class == NodeClass::AlreadyTransformed {
                warn!(key = %leaf.key, path = %leaf.path, "Storing a value that is already a Vault lookup");
            }
            writes.push(PendingWrite { path: leaf.path, value: SecretString::new(leaf.value) });
            Ok::<_, std::convert::Infallible>(())
        })
        .unwrap_or_else(|never| match never {});

    WritePlan { writes, report }
}

/// Store every planned leaf of `document` in `store`, stopping at the first failure.
pub async fn materialize(
    document: &Document,
    config: &MigrationConfig,
    store: &dyn SecretStore,
) -> Result<MaterializeSummary> {
    let plan = plan_writes(document, config);
    let writer = SecretStoreWriter::new(store, config.retry);

    for (written, pending) in plan.writes.iter().enumerate() {
        writer.write(&pending.path, &pending.value).await.map_err(|source| {
            Error::WriteAborted { path: pending.path.to_string(), written, source }
        })?;
    }

    let summary = MaterializeSummary { written: plan.writes.len(), report: plan.report };
    info!(
        written = summary.written,
        already_migrated = summary.report.already_transformed,
        skipped = summary.report.unsupported,
        "All passwords have been stored in Vault"
    );
    Ok(summary)
}

/// Run the whole materializer flow against the configured file and Vault.
pub async fn run_materializer(
    config: &MigrationConfig,
    options: MaterializeOptions,
) -> Result<MaterializeOutcome> {
    if options.dry_run {
        let document = load_document(&config.passwords_file)?;
        let plan = plan_writes(&document, config);
        info!(planned = plan.writes.len(), "Dry run, no secrets written");
        return Ok(MaterializeOutcome::DryRun(plan));
    }

    let store = match connect_store(config, options.require_token)? {
        FlowOutcome::Completed(store) => store,
        FlowOutcome::MissingToken => return Ok(MaterializeOutcome::MissingToken),
    };

    let document = load_document(&config.passwords_file)?;
    let summary = materialize(&document, config, &store).await?;
    Ok(MaterializeOutcome::Completed(summary))
}
