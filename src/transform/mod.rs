//! # Tree Transform Engine
//!
//! Path derivation, leaf classification and the tree walker shared by the
//! redact, materialize and verify flows, plus the lookup expression
//! generator used by the redactor.

pub mod classify;
pub mod lookup;
pub mod path;
pub mod walker;

pub use classify::{classify, classify_scalar, is_lookup_expression, NodeClass, LOOKUP_MARKER};
pub use lookup::{LookupGenerator, LOOKUP_PLUGIN};
pub use path::{derive, PathLayout, SecretPath, DEFAULT_SUB_DIR};
pub use walker::{Leaf, LeafAction, TreeWalker, WalkReport};
