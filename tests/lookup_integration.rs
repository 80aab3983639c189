//! Integration tests for the lookup service and its protocol adapter.
//!
//! These tests drive the public API end to end with `MockFetcher` standing
//! in for Secrets Manager.

use std::sync::Arc;

use sm_login::credentials::{LookupError, LookupService, MissPolicy, SupportedUrls, DOCKER_HUB_URL};
use sm_login::helper::{serve, Action, CredentialHelper, HelperError, ReadOnlyHelper};
use sm_login::secrets::mock::{MockFetcher, MockOperation};
use sm_login::secrets::FetchError;

// =============================================================================
// Test Fixtures
// =============================================================================

const SECRET: &str = "test-secret";

const HUB_PAYLOAD: &str =
    r#"{"https://index.docker.io/v1/": {"Username":"testuser","Password":"testpass"}}"#;

const OTHER_PAYLOAD: &str =
    r#"{"https://example.com": {"Username":"testuser","Password":"testpass"}}"#;

fn service_with(payload: &str) -> (MockFetcher, LookupService<MockFetcher>) {
    let fetcher = MockFetcher::new().with_secret(SECRET, payload);
    let service = LookupService::new(SECRET, SupportedUrls::default(), fetcher.clone());
    (fetcher, service)
}

// =============================================================================
// Lookup scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn docker_hub_credentials_returned() {
        let (fetcher, svc) = service_with(HUB_PAYLOAD);

        let (user, pass) = svc.get(DOCKER_HUB_URL).await.expect("get").into_parts();
        assert_eq!(user, "testuser");
        assert_eq!(pass, "testpass");
        assert_eq!(
            fetcher.operations(),
            vec![MockOperation::FetchCurrent {
                secret_id: SECRET.into()
            }]
        );
    }

    #[tokio::test]
    async fn key_mismatch_returns_empty_pair() {
        let (_, svc) = service_with(OTHER_PAYLOAD);

        let (user, pass) = svc.get(DOCKER_HUB_URL).await.expect("get").into_parts();
        assert_eq!(user, "");
        assert_eq!(pass, "");
    }

    #[tokio::test]
    async fn key_mismatch_errors_when_configured() {
        let (_, svc) = service_with(OTHER_PAYLOAD);
        let svc = svc.with_miss_policy(MissPolicy::Error);

        let err = svc.get(DOCKER_HUB_URL).await.unwrap_err();
        assert!(matches!(err, LookupError::CredentialNotFound(ref url) if url == DOCKER_HUB_URL));
    }

    #[tokio::test]
    async fn unsupported_url_fails_without_fetch() {
        let (fetcher, svc) = service_with(HUB_PAYLOAD);

        let err = svc.get("https://unsupported.com").await.unwrap_err();
        assert_eq!(err.to_string(), "unsupported serverURL: https://unsupported.com");
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_secret_is_secret_not_found() {
        let fetcher = MockFetcher::new()
            .fail_with(FetchError::NotFound("ResourceNotFoundException: secret not found".into()));
        let svc = LookupService::new(SECRET, SupportedUrls::default(), fetcher);

        assert!(matches!(
            svc.get(DOCKER_HUB_URL).await,
            Err(LookupError::SecretNotFound { .. })
        ));
        assert!(matches!(
            svc.list().await,
            Err(LookupError::SecretNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_secret_format_is_malformed() {
        let (_, svc) = service_with(r#"{"https://example.com": "invalid_credentials"}"#);

        let err = svc.list().await.unwrap_err();
        assert!(matches!(err, LookupError::MalformedSecret { .. }));
        assert!(!err.to_string().contains("invalid_credentials"));
    }
}

// =============================================================================
// Concurrency
// =============================================================================

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn shared_service_serves_concurrent_callers() {
        let (fetcher, svc) = service_with(HUB_PAYLOAD);
        let svc = Arc::new(svc);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        svc.get(DOCKER_HUB_URL).await.map(|c| c.username().to_string())
                    } else {
                        svc.list().await.map(|m| m[DOCKER_HUB_URL].clone())
                    }
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.expect("join").expect("lookup"), "testuser");
        }
        assert_eq!(fetcher.call_count(), 16);
    }
}

// =============================================================================
// Protocol adapter
// =============================================================================

mod adapter {
    use super::*;

    #[tokio::test]
    async fn helper_is_read_only() {
        let (fetcher, svc) = service_with(HUB_PAYLOAD);
        let helper = ReadOnlyHelper::new(svc);

        let mut out = Vec::new();
        serve(
            &helper,
            Action::Store,
            r#"{"ServerURL":"https://index.docker.io/v1/","Username":"new","Secret":"x"}"#.as_bytes(),
            &mut out,
        )
        .await
        .expect("store");
        serve(&helper, Action::Erase, DOCKER_HUB_URL.as_bytes(), &mut out)
            .await
            .expect("erase");
        assert_eq!(fetcher.call_count(), 0);

        // Still the stored value, not the one "stored" above.
        let (user, _) = helper.get(DOCKER_HUB_URL).await.expect("get");
        assert_eq!(user, "testuser");
    }

    #[tokio::test]
    async fn helper_through_trait_object() {
        let (_, svc) = service_with(HUB_PAYLOAD);
        let helper: Box<dyn CredentialHelper> = Box::new(ReadOnlyHelper::new(svc));

        let mut out = Vec::new();
        serve(helper.as_ref(), Action::List, std::io::empty(), &mut out)
            .await
            .expect("list");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "{\"https://index.docker.io/v1/\":\"testuser\"}\n"
        );
    }

    #[tokio::test]
    async fn credential_miss_reported_with_docker_message() {
        let (_, svc) = service_with(OTHER_PAYLOAD);
        let helper = ReadOnlyHelper::new(svc.with_miss_policy(MissPolicy::Error));

        let mut out = Vec::new();
        let err = serve(&helper, Action::Get, DOCKER_HUB_URL.as_bytes(), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::CredentialsNotFound));
        assert_eq!(err.to_string(), "credentials not found in native keychain");
        assert!(out.is_empty());
    }
}
