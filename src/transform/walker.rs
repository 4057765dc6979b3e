//! Depth-first tree walker shared by every flow.
//!
//! The walker descends through nested mappings, derives the secret path of
//! each scalar leaf, and hands the leaf to a caller supplied visitor. The
//! visitor can replace the leaf's value in place or stop the walk by
//! returning an error.

use tracing::{debug, info, warn};

use serde_yaml::Value;

use super::classify::{classify, NodeClass};
use super::path::{PathLayout, SecretPath};
use crate::document::{value_kind, Mapping, Node};

/// A scalar leaf handed to the visitor.
#[derive(Debug)]
pub struct Leaf<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub path: SecretPath,
    /// Either [`NodeClass::Fresh`] or [`NodeClass::AlreadyTransformed`].
    pub class: NodeClass,
}

/// What to do with a visited leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafAction {
    Keep,
    Replace(String),
}

/// Counts collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Leaves passed to the visitor.
    pub visited: usize,
    /// Leaves whose value the visitor replaced.
    pub replaced: usize,
    /// Marker-containing leaves left alone.
    pub already_transformed: usize,
    /// Values of unsupported kinds, null included.
    pub unsupported: usize,
}

/// Walks a document tree in key order.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    layout: PathLayout,
    visit_transformed: bool,
}

impl TreeWalker {
    pub fn new(layout: PathLayout) -> Self {
        Self { layout, visit_transformed: false }
    }

    /// Also hand already-transformed leaves to the visitor.
    ///
    /// Off by default: such leaves are skipped without a callback, which is
    /// what makes repeated runs idempotent.
    pub fn visit_transformed(mut self, visit: bool) -> Self {
        self.visit_transformed = visit;
        self
    }

    /// Walk `mapping`, calling `visit` once per eligible leaf.
    ///
    /// The first error returned by `visit` stops the walk and is returned
    /// unchanged; later leaves are not visited.
    pub fn walk<E, F>(&self, mapping: &mut Mapping, mut visit: F) -> Result<WalkReport, E>
    where
        F: FnMut(Leaf<'_>) -> Result<LeafAction, E>,
    {
        let mut report = WalkReport::default();
        let mut ancestors = Vec::new();
        self.walk_mapping(mapping, &mut ancestors, &mut visit, &mut report)?;
        Ok(report)
    }

    /// Read-only walk: same traversal and skips as [`TreeWalker::walk`],
    /// but the tree is borrowed shared and cannot be changed.
    pub fn inspect<E, F>(&self, mapping: &Mapping, mut visit: F) -> Result<WalkReport, E>
    where
        F: FnMut(Leaf<'_>) -> Result<(), E>,
    {
        let mut report = WalkReport::default();
        let mut ancestors = Vec::new();
        self.inspect_mapping(mapping, &mut ancestors, &mut visit, &mut report)?;
        Ok(report)
    }

    fn walk_mapping<E, F>(
        &self,
        mapping: &mut Mapping,
        ancestors: &mut Vec<String>,
        visit: &mut F,
        report: &mut WalkReport,
    ) -> Result<(), E>
    where
        F: FnMut(Leaf<'_>) -> Result<LeafAction, E>,
    {
        for (key, node) in mapping.iter_mut() {
            let class = classify(node);
            match node {
                Node::Mapping(children) => {
                    debug!(key = %key, depth = ancestors.len(), "Descending into nested mapping");
                    ancestors.push(key.clone());
                    let result = self.walk_mapping(children, ancestors, visit, report);
                    ancestors.pop();
                    result?;
                }
                Node::Scalar(value) => {
                    let Some(leaf) = self.leaf(ancestors, key, value, class, report) else {
                        continue;
                    };
                    if let LeafAction::Replace(replacement) = visit(leaf)? {
                        *value = replacement;
                        report.replaced += 1;
                    }
                }
                Node::Unsupported(original) => skip_unsupported(key, original, report),
            }
        }
        Ok(())
    }

    fn inspect_mapping<E, F>(
        &self,
        mapping: &Mapping,
        ancestors: &mut Vec<String>,
        visit: &mut F,
        report: &mut WalkReport,
    ) -> Result<(), E>
    where
        F: FnMut(Leaf<'_>) -> Result<(), E>,
    {
        for (key, node) in mapping {
            let class = classify(node);
            match node {
                Node::Mapping(children) => {
                    debug!(key = %key, depth = ancestors.len(), "Descending into nested mapping");
                    ancestors.push(key.clone());
                    let result = self.inspect_mapping(children, ancestors, visit, report);
                    ancestors.pop();
                    result?;
                }
                Node::Scalar(value) => {
                    if let Some(leaf) = self.leaf(ancestors, key, value, class, report) {
                        visit(leaf)?;
                    }
                }
                Node::Unsupported(original) => skip_unsupported(key, original, report),
            }
        }
        Ok(())
    }

    /// Build the leaf for a scalar, or `None` when it is skipped.
    fn leaf<'a>(
        &self,
        ancestors: &[String],
        key: &'a str,
        value: &'a str,
        class: NodeClass,
        report: &mut WalkReport,
    ) -> Option<Leaf<'a>> {
        if class == NodeClass::AlreadyTransformed && !self.visit_transformed {
            debug!(key = %key, "Value already contains a Vault lookup, leaving it untouched");
            report.already_transformed += 1;
            return None;
        }

        report.visited += 1;
        Some(Leaf { key, value, path: self.layout.derive(ancestors, key), class })
    }
}

fn skip_unsupported(key: &str, value: &Value, report: &mut WalkReport) {
    report.unsupported += 1;
    if value.is_null() {
        info!(key = %key, "Skipping nil value");
    } else {
        warn!(key = %key, kind = value_kind(value), "Skipping unsupported value type");
    }
}
