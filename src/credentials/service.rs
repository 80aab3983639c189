//! credentials::service
//!
//! The lookup service: allow-list check, fetch, decode, select.
//!
//! # Lifecycle of a `get`
//!
//! 1. Reject URLs outside the [`SupportedUrls`] set (no remote call)
//! 2. Fetch the current secret, optionally bounded by a timeout
//! 3. Decode it into a [`SecretMap`]
//! 4. Select the entry for the URL, applying the [`MissPolicy`] on a miss
//!
//! `list` runs steps 2 and 3 and projects the map to usernames.
//!
//! The service holds only immutable configuration, so a single instance can
//! be shared by concurrent callers. Nothing is cached between calls.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::decode::{decode, Credential, SecretMap};
use super::errors::LookupError;
use crate::secrets::{FetchError, SecretFetcher};

/// The Docker Hub registry URL as Docker sends it to credential helpers.
pub const DOCKER_HUB_URL: &str = "https://index.docker.io/v1/";

/// Allow-list of registry URLs the service will serve.
///
/// Matching is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedUrls(BTreeSet<String>);

impl SupportedUrls {
    /// Whether `server_url` is in the set.
    pub fn contains(&self, server_url: &str) -> bool {
        self.0.contains(server_url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SupportedUrls {
    /// Docker Hub only.
    fn default() -> Self {
        [DOCKER_HUB_URL].into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SupportedUrls {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// What `get` does when the secret has no entry for a supported URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissPolicy {
    /// Succeed with an empty username and password.
    #[default]
    Empty,
    /// Fail with [`LookupError::CredentialNotFound`].
    Error,
}

impl std::fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissPolicy::Empty => write!(f, "empty"),
            MissPolicy::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for MissPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" => Ok(MissPolicy::Empty),
            "error" => Ok(MissPolicy::Error),
            other => Err(format!(
                "invalid miss policy '{}', must be one of: empty, error",
                other
            )),
        }
    }
}

/// Read-only credential lookup over a remote secret.
///
/// # Example
///
/// ```
/// use sm_login::credentials::{LookupService, SupportedUrls, DOCKER_HUB_URL};
/// use sm_login::secrets::mock::MockFetcher;
///
/// # tokio_test::block_on(async {
/// let fetcher = MockFetcher::new().with_secret(
///     "docker/hub",
///     r#"{"https://index.docker.io/v1/": {"Username": "alice", "Password": "pw"}}"#,
/// );
/// let service = LookupService::new("docker/hub", SupportedUrls::default(), fetcher);
///
/// let cred = service.get(DOCKER_HUB_URL).await.unwrap();
/// assert_eq!(cred.username(), "alice");
/// # });
/// ```
#[derive(Debug)]
pub struct LookupService<F> {
    secret_id: String,
    supported: SupportedUrls,
    fetcher: F,
    miss_policy: MissPolicy,
    fetch_timeout: Option<Duration>,
}

impl<F: SecretFetcher> LookupService<F> {
    /// Create a service with the default miss policy and no fetch timeout.
    pub fn new(secret_id: impl Into<String>, supported: SupportedUrls, fetcher: F) -> Self {
        Self {
            secret_id: secret_id.into(),
            supported,
            fetcher,
            miss_policy: MissPolicy::default(),
            fetch_timeout: None,
        }
    }

    /// Set the policy for URLs missing from the secret.
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    /// Bound every fetch by `limit`. An elapsed fetch is a `FetchFailed`.
    pub fn with_fetch_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = Some(limit);
        self
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn supported_urls(&self) -> &SupportedUrls {
        &self.supported
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Look up the credential for `server_url`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedUrl` if `server_url` is not allowed (no fetch is made)
    /// - `SecretNotFound` / `FetchFailed` if the fetch fails
    /// - `MalformedSecret` if the payload does not decode
    /// - `CredentialNotFound` on a miss under [`MissPolicy::Error`]
    #[tracing::instrument(skip(self), fields(secret_id = %self.secret_id))]
    pub async fn get(&self, server_url: &str) -> Result<Credential, LookupError> {
        if !self.supported.contains(server_url) {
            return Err(self.report(LookupError::UnsupportedUrl(server_url.to_string())));
        }

        let mut map = self.fetch_secret_map().await?;

        match map.remove(server_url) {
            Some(cred) => {
                debug!(username = cred.username(), "credential found");
                Ok(cred)
            }
            None => match self.miss_policy {
                MissPolicy::Empty => {
                    warn!("secret has no entry for serverURL, returning empty credentials");
                    Ok(Credential::empty())
                }
                MissPolicy::Error => Err(
                    self.report(LookupError::CredentialNotFound(server_url.to_string())),
                ),
            },
        }
    }

    /// List `registry URL → username` for every entry in the secret.
    ///
    /// Passwords are never part of the result.
    #[tracing::instrument(skip(self), fields(secret_id = %self.secret_id))]
    pub async fn list(&self) -> Result<BTreeMap<String, String>, LookupError> {
        let map = self.fetch_secret_map().await?;
        debug!(entries = map.len(), "listing credentials");
        Ok(map.usernames())
    }

    /// Fetch and decode the current secret.
    async fn fetch_secret_map(&self) -> Result<SecretMap, LookupError> {
        let payload = self
            .fetch()
            .await
            .map_err(|e| self.report(LookupError::from_fetch(&self.secret_id, e)))?;

        decode(&payload).map_err(|e| {
            self.report(LookupError::MalformedSecret {
                secret_id: self.secret_id.clone(),
                source: e,
            })
        })
    }

    /// Emit the single error event for a classified failure.
    fn report(&self, err: LookupError) -> LookupError {
        if err.reached_store() {
            error!(kind = err.kind(), backend = self.fetcher.name(), "{}", err);
        } else {
            error!(kind = err.kind(), "{}", err);
        }
        err
    }

    async fn fetch(&self) -> Result<crate::secrets::SecretPayload, FetchError> {
        let fetch = self.fetcher.fetch_current(&self.secret_id);
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or_else(|_| Err(FetchError::Other(format!("timed out after {:?}", limit)))),
            None => fetch.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::mock::MockFetcher;

    const SECRET: &str = "test-secret";

    fn service(fetcher: MockFetcher) -> LookupService<MockFetcher> {
        LookupService::new(SECRET, SupportedUrls::default(), fetcher)
    }

    #[tokio::test]
    async fn get_returns_matching_credential() {
        let fetcher = MockFetcher::new().with_secret(
            SECRET,
            r#"{"https://index.docker.io/v1/": {"Username":"testuser","Password":"testpass"}}"#,
        );

        let cred = service(fetcher).get(DOCKER_HUB_URL).await.expect("get");
        assert_eq!(cred.username(), "testuser");
        assert_eq!(cred.password(), "testpass");
    }

    #[tokio::test]
    async fn unsupported_url_never_fetches() {
        let fetcher = MockFetcher::new();
        let svc = service(fetcher.clone());

        let err = svc.get("https://unsupported.com").await.unwrap_err();
        assert_eq!(err, LookupError::UnsupportedUrl("https://unsupported.com".into()));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn miss_returns_empty_by_default() {
        let fetcher = MockFetcher::new().with_secret(
            SECRET,
            r#"{"https://example.com": {"Username":"testuser","Password":"testpass"}}"#,
        );

        let cred = service(fetcher).get(DOCKER_HUB_URL).await.expect("get");
        assert_eq!(cred.into_parts(), (String::new(), String::new()));
    }

    #[tokio::test]
    async fn miss_errors_under_error_policy() {
        let fetcher = MockFetcher::new().with_secret(
            SECRET,
            r#"{"https://example.com": {"Username":"testuser","Password":"testpass"}}"#,
        );
        let svc = service(fetcher).with_miss_policy(MissPolicy::Error);

        let err = svc.get(DOCKER_HUB_URL).await.unwrap_err();
        assert_eq!(err, LookupError::CredentialNotFound(DOCKER_HUB_URL.into()));
    }

    #[tokio::test]
    async fn secret_not_found_is_classified() {
        let svc = service(MockFetcher::new());

        let err = svc.get(DOCKER_HUB_URL).await.unwrap_err();
        assert!(matches!(err, LookupError::SecretNotFound { .. }));

        let err = svc.list().await.unwrap_err();
        assert!(matches!(err, LookupError::SecretNotFound { .. }));
    }

    #[tokio::test]
    async fn other_fetch_failure_is_fetch_failed() {
        let fetcher = MockFetcher::new().fail_with(FetchError::Other("AccessDeniedException".into()));
        let svc = service(fetcher);

        let err = svc.get(DOCKER_HUB_URL).await.unwrap_err();
        match err {
            LookupError::FetchFailed { secret_id, source } => {
                assert_eq!(secret_id, SECRET);
                assert_eq!(source, FetchError::Other("AccessDeniedException".into()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_malformed_secret() {
        let fetcher =
            MockFetcher::new().with_secret(SECRET, r#"{"https://example.com": "invalid_credentials"}"#);
        let svc = service(fetcher);

        assert!(matches!(
            svc.get(DOCKER_HUB_URL).await.unwrap_err(),
            LookupError::MalformedSecret { .. }
        ));
        assert!(matches!(
            svc.list().await.unwrap_err(),
            LookupError::MalformedSecret { .. }
        ));
    }

    #[tokio::test]
    async fn list_projects_usernames() {
        let fetcher = MockFetcher::new().with_secret(
            SECRET,
            r#"{
                "https://index.docker.io/v1/": {"Username":"a","Password":"pa"},
                "https://example.com": {"Username":"b","Password":"pb"}
            }"#,
        );

        let listed = service(fetcher).list().await.expect("list");
        let expected: BTreeMap<String, String> = [
            ("https://index.docker.io/v1/".to_string(), "a".to_string()),
            ("https://example.com".to_string(), "b".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn every_call_refetches() {
        let fetcher = MockFetcher::new().with_secret(
            SECRET,
            r#"{"https://index.docker.io/v1/": {"Username":"u","Password":"p"}}"#,
        );
        let svc = service(fetcher.clone());

        svc.get(DOCKER_HUB_URL).await.expect("first");
        svc.get(DOCKER_HUB_URL).await.expect("second");
        svc.list().await.expect("list");
        assert_eq!(fetcher.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_timeout_is_fetch_failed() {
        let fetcher = MockFetcher::new()
            .with_secret(SECRET, "{}")
            .with_delay(Duration::from_secs(30));
        let svc = service(fetcher).with_fetch_timeout(Duration::from_secs(5));

        let err = svc.list().await.unwrap_err();
        match err {
            LookupError::FetchFailed { source, .. } => {
                assert!(source.to_string().contains("timed out"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn supported_urls_default_is_docker_hub() {
        let urls = SupportedUrls::default();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains(DOCKER_HUB_URL));
        assert!(!urls.contains("https://index.docker.io/v1"));
    }

    #[test]
    fn miss_policy_parse_and_display() {
        assert_eq!("empty".parse::<MissPolicy>(), Ok(MissPolicy::Empty));
        assert_eq!("ERROR".parse::<MissPolicy>(), Ok(MissPolicy::Error));
        assert!("ignore".parse::<MissPolicy>().is_err());
        assert_eq!(MissPolicy::Error.to_string(), "error");
        assert_eq!(MissPolicy::default(), MissPolicy::Empty);
    }
}
