//! # Passwords Document
//!
//! Loading, modelling and re-serializing the `passwords.yml` document the
//! flows operate on. A [`Document`] is built once per run, mutated by at most
//! one walk, and then written back or dropped.

pub mod node;
pub mod serializer;
pub mod source;

pub use node::{mapping_from_yaml, normalize_key, value_kind, Mapping, Node};
pub use serializer::to_yaml;
pub use source::{load_document, save_document};

use serde_yaml::Value;

use crate::errors::{Error, Result};

/// A parsed passwords document. The root is always a mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    pub fn new(root: Mapping) -> Self {
        Self { root }
    }

    /// Parse YAML text. An empty document yields an empty root mapping.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "<string>")
    }

    /// Parse YAML text, naming `origin` in any error.
    pub fn parse(yaml: &str, origin: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|source| Error::Parse { origin: origin.to_string(), source })?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self::new(mapping_from_yaml(mapping))),
            other => Err(Error::invalid_document(format!(
                "expected a mapping at the root of {}, found {}",
                origin,
                value_kind(&other)
            ))),
        }
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    pub fn into_root(self) -> Mapping {
        self.root
    }

    /// Serialize the whole tree back to YAML text.
    pub fn to_yaml(&self) -> String {
        to_yaml(&self.root)
    }
}
