//! Leaf classification.
//!
//! Decides, for each node the walker meets, whether it is a fresh literal,
//! an already migrated lookup expression, a nested group, or something the
//! migration does not handle.

use crate::document::Node;

/// Substring that identifies a value as an already generated Vault lookup.
pub const LOOKUP_MARKER: &str = "hashi_vault";

/// Classification of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// Literal value eligible for migration.
    Fresh,
    /// Scalar already containing [`LOOKUP_MARKER`].
    AlreadyTransformed,
    /// Nested group to descend into.
    Mapping,
    /// Anything else (lists, numbers, booleans, null).
    Unsupported,
}

pub fn classify(node: &Node) -> NodeClass {
    match node {
        Node::Scalar(value) => classify_scalar(value),
        Node::Mapping(_) => NodeClass::Mapping,
        Node::Unsupported(_) => NodeClass::Unsupported,
    }
}

/// An empty string is always fresh, whatever else is true about it.
pub fn classify_scalar(value: &str) -> NodeClass {
    if value.is_empty() || !is_lookup_expression(value) {
        NodeClass::Fresh
    } else {
        NodeClass::AlreadyTransformed
    }
}

pub fn is_lookup_expression(value: &str) -> bool {
    value.contains(LOOKUP_MARKER)
}
