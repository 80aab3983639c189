//! secrets::traits
//!
//! Secret fetcher trait definition.
//!
//! # Design
//!
//! The `SecretFetcher` trait is the only way the lookup service reaches a
//! remote secret store. It has a single operation that always reads the
//! *current* version of a secret; version pinning is not exposed.
//!
//! The trait is async because fetching involves network I/O. Callers bound
//! the latency by dropping the future (e.g. via `tokio::time::timeout`).
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include payload contents in error messages
//! - Be thread-safe (Send + Sync)
//!
//! # Example
//!
//! ```ignore
//! use sm_login::secrets::{SecretFetcher, FetchError};
//!
//! async fn probe(fetcher: &dyn SecretFetcher) -> Result<usize, FetchError> {
//!     let payload = fetcher.fetch_current("docker/hub").await?;
//!     Ok(payload.len())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from fetching a secret.
///
/// Only two classes are distinguished: the store says the secret does not
/// exist, or something else went wrong. Provider-specific error types are
/// translated into one of these by the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The store reports that the secret identifier does not exist.
    #[error("secret not found: {0}")]
    NotFound(String),

    /// Any other failure (transport, authorization, throttling, ...).
    #[error("failed to fetch secret: {0}")]
    Other(String),
}

impl FetchError {
    /// Check if the store classified this failure as "does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Opaque secret payload as returned by the store.
///
/// The bytes have no structure until decoded. `Debug` never prints them.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPayload(Vec<u8>);

impl SecretPayload {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretPayload {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for SecretPayload {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretPayload([REDACTED; {} bytes])", self.0.len())
    }
}

/// Capability to fetch the current version of a named secret.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one fetcher can be shared by
/// concurrent lookups.
///
/// # Errors
///
/// - `NotFound` if the store has no secret with this identifier
/// - `Other` for every other failure
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Backend name (e.g., "aws", "mock").
    fn name(&self) -> &'static str;

    /// Fetch the current version of `secret_id`.
    ///
    /// # Security
    ///
    /// The returned payload is the raw secret. Do not log or print it.
    async fn fetch_current(&self, secret_id: &str) -> Result<SecretPayload, FetchError>;
}
