//! In-memory tree for a passwords document.
//!
//! YAML parses into an untyped [`serde_yaml::Value`]. Everything downstream
//! works on [`Node`] instead: strings become [`Node::Scalar`], mappings become
//! [`Node::Mapping`] with every key normalized to a string, and anything else
//! is carried untouched as [`Node::Unsupported`].

use std::collections::BTreeMap;

use serde_yaml::Value;
use tracing::warn;

/// String-keyed mapping. Sorted so traversal and output are reproducible.
pub type Mapping = BTreeMap<String, Node>;

/// One value in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal value or an already generated lookup expression.
    Scalar(String),
    /// A nested group of secrets.
    Mapping(Mapping),
    /// Lists, numbers, booleans, null and tagged values. Never transformed.
    Unsupported(Value),
}

impl Node {
    /// Convert a parsed YAML value into a node, recursing into mappings.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Node::Scalar(s),
            Value::Mapping(mapping) => Node::Mapping(mapping_from_yaml(mapping)),
            other => Node::Unsupported(other),
        }
    }

    /// Short name of the node's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "string",
            Node::Mapping(_) => "mapping",
            Node::Unsupported(value) => value_kind(value),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(s.to_string())
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::Mapping(m)
    }
}

/// Convert a YAML mapping with arbitrary key types into a [`Mapping`].
///
/// When two keys normalize to the same string (`1` and `"1"`), the later one
/// in document order wins and a warning is logged.
pub fn mapping_from_yaml(mapping: serde_yaml::Mapping) -> Mapping {
    let mut out = Mapping::new();
    for (key, value) in mapping {
        let key = normalize_key(&key);
        if out.insert(key.clone(), Node::from_value(value)).is_some() {
            warn!(key = %key, "Duplicate key after normalization, keeping the last value");
        }
    }
    out
}

/// String form of a mapping key of any YAML type.
pub fn normalize_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

/// Short name of a YAML value's kind, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
