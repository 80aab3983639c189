//! secrets::aws
//!
//! AWS Secrets Manager fetcher.
//!
//! Every fetch is a `GetSecretValue` call for the `AWSCURRENT` version stage.
//! The payload is the secret's `SecretString`, or its `SecretBinary` when the
//! secret was stored as binary.
//!
//! SDK errors are reduced to the two-way [`FetchError`] classification by
//! [`classify_sdk_error`], so nothing above this module sees SDK types.

use async_trait::async_trait;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::Client;

use super::traits::{FetchError, SecretFetcher, SecretPayload};

/// Version stage that always points at the current secret value.
pub const CURRENT_VERSION_STAGE: &str = "AWSCURRENT";

/// Secret fetcher backed by AWS Secrets Manager.
#[derive(Debug, Clone)]
pub struct AwsSecretsManager {
    client: Client,
}

impl AwsSecretsManager {
    /// Create a fetcher with a pre-built Secrets Manager client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a fetcher using the standard AWS config chain.
    ///
    /// Credentials come from the environment, profiles, SSO or IMDS. The
    /// region is always set explicitly; `endpoint_url` overrides the service
    /// endpoint (e.g. for LocalStack).
    pub async fn from_env(region: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

/// Translate a `GetSecretValue` SDK error into a [`FetchError`].
///
/// `ResourceNotFoundException` becomes `NotFound`; service errors of any
/// other kind, and all transport/timeout/construction failures, become
/// `Other`.
pub fn classify_sdk_error<R>(err: &SdkError<GetSecretValueError, R>) -> FetchError
where
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service_err) => {
            let detail = match (service_err.code(), service_err.message()) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                _ => service_err.to_string(),
            };
            if service_err.is_resource_not_found_exception() {
                FetchError::NotFound(detail)
            } else {
                FetchError::Other(detail)
            }
        }
        None => FetchError::Other(DisplayErrorContext(err).to_string()),
    }
}

#[async_trait]
impl SecretFetcher for AwsSecretsManager {
    fn name(&self) -> &'static str {
        "aws"
    }

    async fn fetch_current(&self, secret_id: &str) -> Result<SecretPayload, FetchError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .version_stage(CURRENT_VERSION_STAGE)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        if let Some(s) = output.secret_string() {
            return Ok(SecretPayload::from(s));
        }
        if let Some(blob) = output.secret_binary() {
            return Ok(SecretPayload::new(blob.as_ref()));
        }
        Err(FetchError::Other(format!(
            "secret '{}' has neither SecretString nor SecretBinary",
            secret_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::types::error::{DecryptionFailure, ResourceNotFoundException};

    #[test]
    fn resource_not_found_is_not_found() {
        let err: SdkError<GetSecretValueError, ()> = SdkError::service_error(
            GetSecretValueError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Secrets Manager can't find the specified secret.")
                    .build(),
            ),
            (),
        );

        let classified = classify_sdk_error(&err);
        assert!(classified.is_not_found());
        assert!(classified.to_string().contains("can't find"));
    }

    #[test]
    fn other_service_error_is_other() {
        let err: SdkError<GetSecretValueError, ()> = SdkError::service_error(
            GetSecretValueError::DecryptionFailure(
                DecryptionFailure::builder().message("kms key disabled").build(),
            ),
            (),
        );

        let classified = classify_sdk_error(&err);
        assert!(!classified.is_not_found());
        assert!(classified.to_string().contains("kms key disabled"));
    }

    #[test]
    fn transport_error_is_other() {
        let err: SdkError<GetSecretValueError, ()> = SdkError::timeout_error("deadline elapsed");

        let classified = classify_sdk_error(&err);
        assert!(matches!(classified, FetchError::Other(_)));
    }

    #[test]
    fn version_stage_constant() {
        assert_eq!(CURRENT_VERSION_STAGE, "AWSCURRENT");
    }
}
