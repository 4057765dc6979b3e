//! Secret path derivation.
//!
//! A leaf's secret path mirrors its position in the document:
//! `base_path / sub_dir / ancestor keys... / leaf key`.
//!
//! Keys are not escaped. A key containing `/` produces a path that is
//! indistinguishable from a deeper nesting, so such documents cannot be
//! migrated faithfully.

use std::fmt;

/// Subdirectory used when none is configured.
pub const DEFAULT_SUB_DIR: &str = "default";

/// Fully derived location of one secret in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecretPath(String);

impl SecretPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SecretPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SecretPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the secret path for `leaf_key` nested under `ancestor_keys`.
///
/// An empty `sub_dir` falls back to [`DEFAULT_SUB_DIR`].
pub fn derive<S: AsRef<str>>(
    base_path: &str,
    sub_dir: &str,
    ancestor_keys: &[S],
    leaf_key: &str,
) -> SecretPath {
    let sub_dir = if sub_dir.is_empty() { DEFAULT_SUB_DIR } else { sub_dir };

    let mut path = String::with_capacity(
        base_path.len()
            + sub_dir.len()
            + leaf_key.len()
            + ancestor_keys.iter().map(|k| k.as_ref().len() + 1).sum::<usize>()
            + 2,
    );
    path.push_str(base_path);
    path.push('/');
    path.push_str(sub_dir);
    for key in ancestor_keys {
        path.push('/');
        path.push_str(key.as_ref());
    }
    path.push('/');
    path.push_str(leaf_key);

    SecretPath(path)
}

/// Base path and subdirectory shared by every leaf of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    base_path: String,
    sub_dir: String,
}

impl PathLayout {
    pub fn new(base_path: impl Into<String>, sub_dir: impl Into<String>) -> Self {
        let sub_dir = sub_dir.into();
        let sub_dir = if sub_dir.is_empty() { DEFAULT_SUB_DIR.to_string() } else { sub_dir };
        Self { base_path: base_path.into(), sub_dir }
    }

    /// `base_path/sub_dir`, the prefix every derived path starts with.
    pub fn root(&self) -> String {
        format!("{}/{}", self.base_path, self.sub_dir)
    }

    pub fn derive<S: AsRef<str>>(&self, ancestor_keys: &[S], leaf_key: &str) -> SecretPath {
        derive(&self.base_path, &self.sub_dir, ancestor_keys, leaf_key)
    }
}
