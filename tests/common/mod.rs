//! Shared helpers for the flow integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kolla_vault::secrets::{Result, SecretPayload, SecretStore, StoreError};
use kolla_vault::transform::SecretPath;
use kolla_vault::MigrationConfig;

/// The document used across the flow tests.
pub const SCENARIO: &str = "\
db_password: ''
rabbit:
  password: ''
  user: guest-already:hashi_vault:ref
";

/// In-memory store that records every write attempt in order.
#[derive(Default)]
pub struct RecordingStore {
    entries: Mutex<BTreeMap<String, String>>,
    attempts: Mutex<Vec<String>>,
    fail_on_attempt: Option<usize>,
    transient_failures: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`th write attempt (1-based) and every later one.
    pub fn failing_on(n: usize) -> Self {
        Self { fail_on_attempt: Some(n), ..Self::default() }
    }

    /// Reject the first `count` attempts, then accept.
    pub fn flaky(count: usize) -> Self {
        Self { transient_failures: AtomicUsize::new(count), ..Self::default() }
    }

    pub fn with_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        {
            let mut entries = store.entries.lock().unwrap();
            for (path, value) in pairs {
                entries.insert(path.to_string(), value.to_string());
            }
        }
        store
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for RecordingStore {
    async fn write_secret(&self, path: &SecretPath, payload: &SecretPayload) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(path.to_string());
            attempts.len()
        };

        if self.fail_on_attempt.is_some_and(|n| attempt >= n) {
            return Err(StoreError::write_rejected(path.as_str(), "permission denied"));
        }
        if self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::write_rejected(path.as_str(), "503 Service Unavailable"));
        }

        self.entries.lock().unwrap().insert(path.to_string(), payload.value.clone());
        Ok(())
    }

    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretPayload>> {
        Ok(self.entries.lock().unwrap().get(path.as_str()).map(|v| SecretPayload::new(v.clone())))
    }
}

/// Default configuration pointed at `file`.
pub fn config_for(file: &Path) -> MigrationConfig {
    MigrationConfig { passwords_file: file.to_path_buf(), ..MigrationConfig::default() }
}

/// Write `contents` to a fresh passwords file inside `dir`.
pub fn write_passwords(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("passwords.yml");
    std::fs::write(&path, contents).unwrap();
    path
}
