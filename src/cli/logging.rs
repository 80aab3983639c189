//! cli::logging
//!
//! Diagnostic log setup.
//!
//! Stdout carries protocol responses and Docker reads stderr as part of the
//! failure message, so diagnostics go to a file: `<cache>/log/sm-login.log`.
//! If the log directory cannot be created the system temp directory is used
//! instead; if the file cannot be opened logging stays disabled.
//!
//! The filter defaults to debug for this crate and warn for dependencies,
//! and can be replaced through `SM_LOGIN_LOG` (tracing `EnvFilter` syntax).

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::paths::{SmPaths, LOG_FILE_NAME};

/// Environment variable holding a tracing filter directive.
pub const LOG_FILTER_ENV: &str = "SM_LOGIN_LOG";

const DEFAULT_FILTER: &str = "sm_login=debug,warn";

/// Install the file logger.
///
/// Returns the log file path when logging was enabled.
pub fn init(paths: Option<&SmPaths>) -> Option<PathBuf> {
    let dir = prepare_log_dir(paths.map(SmPaths::log_dir));
    let path = dir.join(LOG_FILE_NAME);

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(_) => return None,
    };

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .ok()
        .map(|_| path)
}

/// Create the log directory, falling back to the temp directory.
fn prepare_log_dir(preferred: Option<PathBuf>) -> PathBuf {
    let Some(dir) = preferred else {
        eprintln!("log: failed to find directory, using temp dir");
        return std::env::temp_dir();
    };

    match create_private_dir(&dir) {
        Ok(()) => dir,
        Err(e) => {
            eprintln!("log: failed to create directory: {}", e);
            std::env::temp_dir()
        }
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
