//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file (see [`schema`] for locations)
//! 3. Environment variables (`DOCKER_SECRET_NAME`, `AWS_REGION`,
//!    `SM_LOGIN_ENDPOINT_URL`)
//! 4. CLI flags
//!
//! Steps 3 and 4 arrive together as [`Overrides`]; clap reads the
//! environment variables as fallbacks for the flags.
//!
//! # Example
//!
//! ```no_run
//! use sm_login::core::config::{Config, Overrides};
//!
//! let config = Config::load(&Overrides::default()).unwrap();
//! println!("Secret: {} ({})", config.secret_name, config.region);
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::paths::SmPaths;
use crate::credentials::MissPolicy;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "ap-southeast-2";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SM_LOGIN_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("DOCKER_SECRET_NAME is not set")]
    MissingSecretName,
}

/// Values from CLI flags and their environment-variable fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub secret_name: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub config_path: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Secrets Manager secret holding the registry credentials
    pub secret_name: String,
    /// AWS region of the secret
    pub region: String,
    /// Override for the Secrets Manager endpoint
    pub endpoint_url: Option<String>,
    /// Upper bound on one fetch
    pub fetch_timeout: Option<Duration>,
    /// Behavior when the secret has no entry for a supported registry
    pub miss_policy: MissPolicy,
    /// Config file that contributed values, if any
    pub file_path: Option<PathBuf>,
}

impl Config {
    /// Locate and read the config file, then apply `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed, if any value is invalid, or if no secret name is configured.
    /// A missing config file is not an error.
    pub fn load(overrides: &Overrides) -> Result<Config, ConfigError> {
        let file_path = Self::locate(overrides.config_path.as_deref());
        let file = match &file_path {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };

        let mut config = Self::resolve(file, overrides)?;
        config.file_path = file_path;
        Ok(config)
    }

    /// Merge file values with overrides and apply defaults.
    pub fn resolve(file: FileConfig, overrides: &Overrides) -> Result<Config, ConfigError> {
        file.validate()?;

        let secret_name = overrides
            .secret_name
            .clone()
            .filter(|s| !s.is_empty())
            .or(file.secret_name)
            .ok_or(ConfigError::MissingSecretName)?;
        schema::validate_secret_name(&secret_name)?;

        let region = overrides
            .region
            .clone()
            .filter(|s| !s.is_empty())
            .or(file.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        schema::validate_region(&region)?;

        let endpoint_url = overrides
            .endpoint_url
            .clone()
            .filter(|s| !s.is_empty())
            .or(file.endpoint_url);
        if let Some(url) = &endpoint_url {
            schema::validate_endpoint_url(url)?;
        }

        Ok(Config {
            secret_name,
            region,
            endpoint_url,
            fetch_timeout: file.fetch_timeout_secs.map(Duration::from_secs),
            miss_policy: file.on_missing.unwrap_or_default(),
            file_path: None,
        })
    }

    /// Find the config file to read.
    ///
    /// An explicit path (flag or `$SM_LOGIN_CONFIG`) is used exclusively,
    /// whether or not it exists, so a mistyped path surfaces as a
    /// `ReadError`. Otherwise the first existing default location wins.
    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        let explicit = explicit.map(Path::to_path_buf).or_else(|| {
            std::env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        if explicit.is_some() {
            return explicit;
        }

        let mut candidates = Vec::new();

        // $XDG_CONFIG_HOME/sm-login/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("sm-login/config.toml"));
        }

        // ~/.sm/config.toml
        if let Some(paths) = SmPaths::home_default() {
            candidates.push(paths.config_file());
        }

        candidates.into_iter().find(|p| p.exists())
    }

    /// Read and parse a config file.
    pub fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
