//! Redactor flow: replace literal passwords with Vault lookup expressions.
//!
//! Load the document, rewrite every fresh leaf at any depth into a lookup
//! expression for its derived path, and write the document back. Leaves
//! that already hold a lookup are left alone, so running the flow twice
//! changes nothing the second time.

use std::convert::Infallible;
use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::config::MigrationConfig;
use crate::document::{load_document, save_document, Document};
use crate::errors::{Error, Result};
use crate::transform::{LeafAction, TreeWalker, WalkReport};

/// Where the redacted document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedactTarget {
    /// Overwrite the source file.
    InPlace,
    /// Write to another file, leaving the source untouched.
    File(PathBuf),
    /// Print to standard output.
    Stdout,
}

/// Rewrite every fresh leaf of `document` into a lookup expression.
pub fn redact(document: &mut Document, config: &MigrationConfig) -> WalkReport {
    let walker = TreeWalker::new(config.path_layout());
    let generator = config.lookup_generator();

    walker
        .walk(document.root_mut(), |leaf| {
            info!(key = %leaf.key, path = %leaf.path, "Updating key with Vault lookup");
            Ok::<_, Infallible>(LeafAction::Replace(generator.generate(&leaf.path)))
        })
        .unwrap_or_else(|never| match never {})
}

/// Run the whole redactor flow against the configured passwords file.
pub fn run_redactor(config: &MigrationConfig, target: &RedactTarget) -> Result<WalkReport> {
    let mut document = load_document(&config.passwords_file)?;
    let report = redact(&mut document, config);

    match target {
        RedactTarget::InPlace => save_document(&config.passwords_file, &document)?,
        RedactTarget::File(path) => save_document(path, &document)?,
        RedactTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.to_yaml().as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| Error::io("Failed to write redacted document to stdout", e))?;
        }
    }

    info!(
        updated = report.replaced,
        already_migrated = report.already_transformed,
        skipped = report.unsupported,
        "Passwords document updated with Vault secret references"
    );
    Ok(report)
}
