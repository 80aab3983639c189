//! core::paths
//!
//! Centralized path routing for sm-login's local files.
//!
//! # Storage Layout
//!
//! Everything lives under one cache directory, `$AWS_ECR_CACHE_DIR` if set,
//! otherwise `~/.sm`:
//! - `config.toml` - Optional configuration file
//! - `log/sm-login.log` - Diagnostic log
//!
//! # Example
//!
//! ```
//! use sm_login::core::paths::SmPaths;
//! use std::path::PathBuf;
//!
//! let paths = SmPaths::new(PathBuf::from("/tmp/sm"));
//! assert_eq!(paths.log_file(), PathBuf::from("/tmp/sm/log/sm-login.log"));
//! ```

use std::path::{Path, PathBuf};

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "AWS_ECR_CACHE_DIR";

/// Cache directory used when the environment variable is unset.
pub const DEFAULT_CACHE_DIR: &str = "~/.sm";

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "sm-login.log";

/// Path routing rooted at the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmPaths {
    cache_dir: PathBuf,
}

impl SmPaths {
    /// Paths rooted at an explicit cache directory.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Paths rooted at `$AWS_ECR_CACHE_DIR` or `~/.sm`.
    ///
    /// Returns `None` if the directory starts with `~` and the home
    /// directory cannot be determined.
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(CACHE_DIR_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string());
        expand_home(&raw).map(Self::new)
    }

    /// Paths rooted at `~/.sm`, ignoring the environment.
    pub fn home_default() -> Option<Self> {
        expand_home(DEFAULT_CACHE_DIR).map(Self::new)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.cache_dir.join("config.toml")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.cache_dir.join("log")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir().join(LOG_FILE_NAME)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> Option<PathBuf> {
    if raw == "~" {
        return dirs::home_dir();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(raw)),
    }
}
