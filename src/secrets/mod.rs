//! secrets
//!
//! Remote secret fetching abstraction.
//!
//! # Architecture
//!
//! Secrets are read through the [`SecretFetcher`] trait, which has two
//! implementations:
//!
//! - [`AwsSecretsManager`]: AWS Secrets Manager, current version only
//! - [`mock::MockFetcher`]: in-memory, call-recording fetcher for tests
//!
//! The lookup service only ever sees [`SecretPayload`] and [`FetchError`];
//! provider error types stay inside their backend module.
//!
//! # Security
//!
//! - Payloads are **never** logged or included in error messages
//! - `SecretPayload`'s `Debug` output is redacted
//!
//! # Example
//!
//! ```ignore
//! use sm_login::secrets::{AwsSecretsManager, SecretFetcher};
//!
//! let fetcher = AwsSecretsManager::from_env("ap-southeast-2", None).await;
//! let payload = fetcher.fetch_current("docker/hub").await?;
//! ```

mod aws;
pub mod mock;
mod traits;

pub use aws::{classify_sdk_error, AwsSecretsManager, CURRENT_VERSION_STAGE};
pub use traits::{FetchError, SecretFetcher, SecretPayload};
