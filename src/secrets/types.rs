//! Secure wrappers for the values this tool moves around.
//!
//! Password literals and the Vault access token pass through logs, error
//! messages and `Debug` output all over the flows. These types keep them out.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper that redacts its contents in `Debug` and `Display`.
///
/// The memory is zeroed when the value is dropped. The only way to read the
/// value is [`SecretString::expose_secret`].
///
/// ```rust
/// use kolla_vault::secrets::SecretString;
///
/// let token = SecretString::new("hvs.example");
/// assert_eq!(format!("{:?}", token), "SecretString([REDACTED])");
/// assert_eq!(token.expose_secret(), "hvs.example");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new SecretString from a string value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value.
    ///
    /// Only call this at the point the value leaves the process (store
    /// payloads, client credentials). Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns the length of the secret without exposing the value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Body stored at every secret path: `{"value": "<literal>"}`.
///
/// Unlike [`SecretString`] this serializes the real value, because it is
/// the wire payload. `Debug` is still redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPayload {
    pub value: String,
}

impl SecretPayload {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

impl From<&SecretString> for SecretPayload {
    fn from(secret: &SecretString) -> Self {
        Self::new(secret.expose_secret())
    }
}

impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayload").field("value", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacts_debug() {
        let secret = SecretString::new("super-secret-value");
        let debug_output = format!("{:?}", secret);

        assert_eq!(debug_output, "SecretString([REDACTED])");
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_secret_string_redacts_display() {
        let secret = SecretString::new("super-secret-value");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_secret_string_expose() {
        let secret = SecretString::new("my-secret");
        assert_eq!(secret.expose_secret(), "my-secret");
        assert_eq!(secret.len(), 9);
        assert!(SecretString::new("").is_empty());
    }

    #[test]
    fn test_payload_serializes_value_field() {
        let payload = SecretPayload::new("hunter2");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "value": "hunter2" }));
    }

    #[test]
    fn test_payload_debug_redacts() {
        let payload = SecretPayload::from(&SecretString::new("hunter2"));
        let debug_output = format!("{:?}", payload);
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
