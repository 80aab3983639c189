//! secrets::mock
//!
//! Mock fetcher implementation for deterministic testing.
//!
//! # Design
//!
//! The mock fetcher stores payloads in memory keyed by secret identifier and
//! records every call, so tests can assert how many times (and for which
//! identifier) the remote store would have been hit. A failure can be forced
//! for all calls, and an artificial delay can be injected to exercise
//! timeouts.
//!
//! # Example
//!
//! ```
//! use sm_login::secrets::mock::MockFetcher;
//! use sm_login::secrets::SecretFetcher;
//!
//! # tokio_test::block_on(async {
//! let fetcher = MockFetcher::new()
//!     .with_secret("docker/hub", r#"{"https://index.docker.io/v1/":{"Username":"u","Password":"p"}}"#);
//!
//! let payload = fetcher.fetch_current("docker/hub").await.unwrap();
//! assert!(!payload.is_empty());
//! assert_eq!(fetcher.call_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{FetchError, SecretFetcher, SecretPayload};

/// Mock fetcher for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockFetcher {
    inner: Arc<Mutex<MockFetcherInner>>,
}

#[derive(Debug)]
struct MockFetcherInner {
    /// Stored payloads by secret identifier.
    secrets: HashMap<String, SecretPayload>,
    /// Error returned by every call when set.
    fail_with: Option<FetchError>,
    /// Sleep before answering.
    delay: Option<Duration>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    FetchCurrent { secret_id: String },
}

impl MockFetcher {
    /// Create a mock fetcher with no secrets.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockFetcherInner {
                secrets: HashMap::new(),
                fail_with: None,
                delay: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Add (or replace) a secret payload.
    pub fn with_secret(self, secret_id: &str, payload: impl Into<SecretPayload>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.secrets.insert(secret_id.to_string(), payload.into());
        }
        self
    }

    /// Configure every fetch to fail with `err`.
    ///
    /// # Example
    ///
    /// ```
    /// use sm_login::secrets::mock::MockFetcher;
    /// use sm_login::secrets::FetchError;
    ///
    /// let fetcher = MockFetcher::new()
    ///     .fail_with(FetchError::Other("throttled".into()));
    /// ```
    pub fn fail_with(self, err: FetchError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_with = Some(err);
        }
        self
    }

    /// Delay every answer by `delay`.
    pub fn with_delay(self, delay: Duration) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.delay = Some(delay);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_with = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Number of fetch calls made so far.
    pub fn call_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.operations.len()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_current(&self, secret_id: &str) -> Result<SecretPayload, FetchError> {
        self.record(MockOperation::FetchCurrent {
            secret_id: secret_id.to_string(),
        });

        let delay = self.inner.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }

        inner.secrets.get(secret_id).cloned().ok_or_else(|| {
            FetchError::NotFound(format!(
                "Secrets Manager can't find the specified secret: {}",
                secret_id
            ))
        })
    }
}
