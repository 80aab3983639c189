//! helper::traits
//!
//! The narrow read-only source and the wide host helper interface.
//!
//! # Design
//!
//! The lookup service only knows how to read. The Docker host protocol,
//! however, requires add/store/delete as well. Rather than growing the core,
//! [`ReadOnlyHelper`] adapts any [`CredentialSource`] to the wide
//! [`CredentialHelper`] interface, answering mutations with a logged no-op.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::credentials::{Credential, LookupError, LookupService};
use crate::secrets::SecretFetcher;

/// Message Docker recognizes as "no credentials stored".
pub const CREDENTIALS_NOT_FOUND: &str = "credentials not found in native keychain";

/// Errors surfaced through the host protocol.
#[derive(Debug, Error)]
pub enum HelperError {
    /// No credentials for the requested server.
    #[error("credentials not found in native keychain")]
    CredentialsNotFound,

    /// The request carried no server URL.
    #[error("no credentials server URL")]
    MissingServerUrl,

    /// A store request carried no username.
    #[error("no credentials username")]
    MissingUsername,

    /// The action name is not part of the protocol.
    #[error("unknown credential action `{0}`")]
    UnknownAction(String),

    /// The request body could not be parsed.
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// Any other lookup failure.
    #[error(transparent)]
    Lookup(LookupError),

    /// Reading the request or writing the response failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LookupError> for HelperError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::CredentialNotFound(_) => HelperError::CredentialsNotFound,
            other => HelperError::Lookup(other),
        }
    }
}

/// Credentials as exchanged with the Docker host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCredentials {
    #[serde(rename = "ServerURL", default)]
    pub server_url: String,
    #[serde(rename = "Username", default)]
    pub username: String,
    #[serde(rename = "Secret", default)]
    pub secret: String,
}

/// Read-only source of registry credentials.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Credential for `server_url`.
    async fn get(&self, server_url: &str) -> Result<Credential, LookupError>;

    /// `server URL → username` for every known registry.
    async fn list(&self) -> Result<BTreeMap<String, String>, LookupError>;
}

#[async_trait]
impl<F: SecretFetcher> CredentialSource for LookupService<F> {
    async fn get(&self, server_url: &str) -> Result<Credential, LookupError> {
        LookupService::get(self, server_url).await
    }

    async fn list(&self) -> Result<BTreeMap<String, String>, LookupError> {
        LookupService::list(self).await
    }
}

/// The full interface the Docker host protocol expects of a helper.
#[async_trait]
pub trait CredentialHelper: Send + Sync {
    /// Save credentials for a server.
    async fn add(&self, creds: &HostCredentials) -> Result<(), HelperError>;

    /// Alias of `add` kept for hosts that call it by this name.
    async fn store(&self, creds: &HostCredentials) -> Result<(), HelperError> {
        self.add(creds).await
    }

    /// Remove credentials for a server.
    async fn delete(&self, server_url: &str) -> Result<(), HelperError>;

    /// `(username, secret)` for a server.
    async fn get(&self, server_url: &str) -> Result<(String, String), HelperError>;

    /// `server URL → username` for every known server.
    async fn list(&self) -> Result<BTreeMap<String, String>, HelperError>;
}

/// Adapts a [`CredentialSource`] to [`CredentialHelper`].
///
/// `add`, `store` and `delete` log that they are not implemented and
/// succeed, so the host never sees a failed write from a read-only source.
#[derive(Debug)]
pub struct ReadOnlyHelper<S> {
    source: S,
}

impl<S: CredentialSource> ReadOnlyHelper<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: CredentialSource> CredentialHelper for ReadOnlyHelper<S> {
    async fn add(&self, _creds: &HostCredentials) -> Result<(), HelperError> {
        error!("Add is not implemented");
        Ok(())
    }

    async fn store(&self, _creds: &HostCredentials) -> Result<(), HelperError> {
        error!("Store is not implemented");
        Ok(())
    }

    async fn delete(&self, _server_url: &str) -> Result<(), HelperError> {
        error!("Delete is not implemented");
        Ok(())
    }

    async fn get(&self, server_url: &str) -> Result<(String, String), HelperError> {
        let cred = self.source.get(server_url).await?;
        Ok(cred.into_parts())
    }

    async fn list(&self) -> Result<BTreeMap<String, String>, HelperError> {
        Ok(self.source.list().await?)
    }
}
