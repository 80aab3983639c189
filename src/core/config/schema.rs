//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Location
//!
//! `--config` or `$SM_LOGIN_CONFIG` names the only file read, and it must
//! exist. Without either, searched in order (first existing file wins):
//! 1. `$XDG_CONFIG_HOME/sm-login/config.toml`
//! 2. `~/.sm/config.toml`
//!
//! # Validation
//!
//! Values are validated after parsing; unknown keys are rejected.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::credentials::MissPolicy;

/// Settings read from the config file.
///
/// Every field is optional; environment variables and CLI flags override
/// whatever is set here.
///
/// # Example
///
/// ```toml
/// secret_name = "docker/hub"
/// region = "ap-southeast-2"
/// endpoint_url = "http://localhost:4566"
/// fetch_timeout_secs = 10
/// on_missing = "error"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Secrets Manager secret holding the registry credentials
    pub secret_name: Option<String>,

    /// AWS region of the secret
    pub region: Option<String>,

    /// Override for the Secrets Manager endpoint
    pub endpoint_url: Option<String>,

    /// Upper bound on one fetch, in seconds
    pub fetch_timeout_secs: Option<u64>,

    /// Behavior when the secret has no entry for a supported registry
    pub on_missing: Option<MissPolicy>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.secret_name {
            validate_secret_name(name)?;
        }

        if let Some(region) = &self.region {
            validate_region(region)?;
        }

        if let Some(url) = &self.endpoint_url {
            validate_endpoint_url(url)?;
        }

        if self.fetch_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "fetch_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Secret identifiers are passed to Secrets Manager as-is, so a friendly
/// name, a partial ARN and a full ARN are all accepted. Only empty values and
/// values containing whitespace or control characters are rejected.
pub(crate) fn validate_secret_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidValue("secret_name cannot be empty".into()));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::InvalidValue(format!(
            "invalid secret_name '{}': whitespace is not allowed",
            name.escape_debug()
        )));
    }
    Ok(())
}

pub(crate) fn validate_region(region: &str) -> Result<(), ConfigError> {
    let valid = !region.is_empty()
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(ConfigError::InvalidValue(format!(
            "invalid region '{}'",
            region
        )));
    }
    Ok(())
}

pub(crate) fn validate_endpoint_url(url: &str) -> Result<(), ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(format!(
            "invalid endpoint_url '{}': must start with http:// or https://",
            url
        )));
    }
    Ok(())
}
