//! credentials::errors
//!
//! Lookup error taxonomy.
//!
//! # Design
//!
//! Every failure of a lookup lands in exactly one [`LookupError`] variant.
//! Fetch failures are classified from [`FetchError`] by
//! [`LookupError::from_fetch`]; decode failures always become
//! `MalformedSecret`. None of the messages carry secret values.
//!
//! # Example
//!
//! ```
//! use sm_login::credentials::LookupError;
//! use sm_login::secrets::FetchError;
//!
//! let err = LookupError::from_fetch("docker/hub", FetchError::NotFound("gone".into()));
//! assert!(matches!(err, LookupError::SecretNotFound { .. }));
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

use super::decode::DecodeError;
use crate::secrets::FetchError;

/// Errors from credential lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The requested registry URL is not in the supported set.
    #[error("unsupported serverURL: {0}")]
    UnsupportedUrl(String),

    /// The secret store has no secret with the configured identifier.
    #[error("secret '{secret_id}' not found in secret store: {source}")]
    SecretNotFound {
        secret_id: String,
        source: FetchError,
    },

    /// Fetching the secret failed for any other reason.
    #[error("failed to get secret '{secret_id}': {source}")]
    FetchFailed {
        secret_id: String,
        source: FetchError,
    },

    /// The secret exists but does not decode into a credential map.
    #[error("unrecognised secret data in '{secret_id}', please read README: {source}")]
    MalformedSecret {
        secret_id: String,
        source: DecodeError,
    },

    /// The secret decodes but has no entry for the requested URL.
    #[error("secret not found for serverURL: {0}")]
    CredentialNotFound(String),
}

impl LookupError {
    /// Classify a fetch failure.
    ///
    /// `NotFound` becomes `SecretNotFound`; everything else `FetchFailed`.
    pub fn from_fetch(secret_id: &str, err: FetchError) -> Self {
        if err.is_not_found() {
            LookupError::SecretNotFound {
                secret_id: secret_id.to_string(),
                source: err,
            }
        } else {
            LookupError::FetchFailed {
                secret_id: secret_id.to_string(),
                source: err,
            }
        }
    }

    /// Short machine-friendly name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::UnsupportedUrl(_) => "unsupported_url",
            LookupError::SecretNotFound { .. } => "secret_not_found",
            LookupError::FetchFailed { .. } => "fetch_failed",
            LookupError::MalformedSecret { .. } => "malformed_secret",
            LookupError::CredentialNotFound(_) => "credential_not_found",
        }
    }

    /// Check if this error means "nothing stored for this request".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LookupError::SecretNotFound { .. } | LookupError::CredentialNotFound(_)
        )
    }

    /// Check if the lookup got as far as calling the secret store.
    ///
    /// Only `UnsupportedUrl` short-circuits before any remote call.
    pub fn reached_store(&self) -> bool {
        !matches!(self, LookupError::UnsupportedUrl(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unsupported_url_message() {
        let err = LookupError::UnsupportedUrl("https://unsupported.com".into());
        assert_eq!(err.to_string(), "unsupported serverURL: https://unsupported.com");
        assert!(!err.reached_store());
    }

    #[test]
    fn classify_not_found() {
        let err = LookupError::from_fetch("s", FetchError::NotFound("no such secret".into()));
        assert!(matches!(err, LookupError::SecretNotFound { .. }));
        assert!(err.to_string().contains("no such secret"));
        assert_eq!(err.kind(), "secret_not_found");
    }

    #[test]
    fn classify_other() {
        let err = LookupError::from_fetch("s", FetchError::Other("AccessDenied".into()));
        assert!(matches!(err, LookupError::FetchFailed { .. }));
        assert!(!err.is_not_found());
        assert!(err.reached_store());
    }

    #[test]
    fn fetch_cause_is_source() {
        let err = LookupError::from_fetch("s", FetchError::Other("reset".into()));
        let source = err.source().expect("source");
        assert!(source.to_string().contains("reset"));
    }

    #[test]
    fn malformed_secret_message() {
        let err = LookupError::MalformedSecret {
            secret_id: "s".into(),
            source: DecodeError::Syntax("line 1 column 1".into()),
        };
        assert!(err.to_string().contains("please read README"));
        assert_eq!(err.kind(), "malformed_secret");
    }

    #[test]
    fn credential_not_found_is_not_found() {
        let err = LookupError::CredentialNotFound("https://index.docker.io/v1/".into());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("https://index.docker.io/v1/"));
    }
}
