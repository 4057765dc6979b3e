//! Secret store writer used by the materializer.
//!
//! Wraps a [`SecretStore`] with the configured [`RetryPolicy`]. Each call
//! stores one literal as `{"value": ...}` at one path.

use tracing::{error, warn};

use super::error::Result;
use super::retry::RetryPolicy;
use super::store::SecretStore;
use super::types::{SecretPayload, SecretString};
use crate::transform::SecretPath;

pub struct SecretStoreWriter<'a> {
    store: &'a dyn SecretStore,
    retry: RetryPolicy,
}

impl<'a> SecretStoreWriter<'a> {
    pub fn new(store: &'a dyn SecretStore, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Store `value` at `path`.
    ///
    /// Retryable failures are retried as the policy allows. The last error is
    /// returned once attempts run out.
    pub async fn write(&self, path: &SecretPath, value: &SecretString) -> Result<()> {
        let payload = SecretPayload::from(value);
        let mut attempt = 1;

        loop {
            let err = match self.store.write_secret(path, &payload).await {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            match self.retry.delay_after(attempt) {
                Some(delay) if err.is_retryable() => {
                    warn!(
                        path = %path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Secret write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                _ => {
                    error!(path = %path, attempts = attempt, error = %err, "Error storing secret");
                    return Err(err);
                }
            }
        }
    }
}
