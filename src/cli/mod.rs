//! cli
//!
//! Command-line interface layer for sm-login.
//!
//! # Responsibilities
//!
//! - Parse the action and options
//! - Initialize file logging
//! - Resolve configuration and build the AWS-backed lookup service
//! - Run one protocol action over stdin/stdout
//!
//! # Architecture
//!
//! The CLI layer is thin. Everything with logic lives in
//! [`crate::credentials`]; the protocol framing lives in [`crate::helper`].

pub mod args;
pub mod logging;

pub use args::{Cli, Command};

use std::io;

use anyhow::Result;
use tracing::{debug, error};

use crate::core::config::Config;
use crate::core::paths::SmPaths;
use crate::credentials::{LookupService, SupportedUrls};
use crate::helper::{serve, write_version, Action, ReadOnlyHelper};
use crate::secrets::{AwsSecretsManager, SecretFetcher};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. The caller prints the
/// returned error to stdout, where Docker expects it.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let paths = SmPaths::from_env();
    let log_file = logging::init(paths.as_ref());
    debug!(?log_file, command = ?cli.command, "starting");

    let action = cli.command.action();

    // `version` must work without any configuration
    if action == Action::Version {
        write_version(io::stdout().lock())?;
        return Ok(());
    }

    let config = Config::load(&cli.overrides()).inspect_err(|e| error!("{}", e))?;
    debug!(
        secret_name = %config.secret_name,
        region = %config.region,
        miss_policy = %config.miss_policy,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let fetcher =
            AwsSecretsManager::from_env(&config.region, config.endpoint_url.as_deref()).await;
        let service = build_service(&config, fetcher);
        debug!(
            supported = ?service.supported_urls().iter().collect::<Vec<_>>(),
            "serving registries"
        );
        let helper = ReadOnlyHelper::new(service);
        serve(&helper, action, io::stdin().lock(), io::stdout().lock()).await
    })?;

    Ok(())
}

/// Build the lookup service described by `config`.
pub fn build_service<F: SecretFetcher>(config: &Config, fetcher: F) -> LookupService<F> {
    let service = LookupService::new(config.secret_name.clone(), SupportedUrls::default(), fetcher)
        .with_miss_policy(config.miss_policy);
    match config.fetch_timeout {
        Some(limit) => service.with_fetch_timeout(limit),
        None => service,
    }
}
