//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Docker invokes the helper as `docker-credential-sm-login <action>` with no
//! other arguments, so every option has an environment-variable fallback:
//! - `--secret-name` / `DOCKER_SECRET_NAME`
//! - `--region` / `AWS_REGION`
//! - `--endpoint-url` / `SM_LOGIN_ENDPOINT_URL`
//! - `--config` / `SM_LOGIN_CONFIG`

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Overrides;
use crate::helper::Action;

/// sm-login - Docker credential helper backed by AWS Secrets Manager
#[derive(Parser, Debug)]
#[command(name = "docker-credential-sm-login")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Secrets Manager secret holding the registry credentials
    #[arg(long, env = "DOCKER_SECRET_NAME", global = true)]
    pub secret_name: Option<String>,

    /// AWS region of the secret [default: ap-southeast-2]
    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    /// Override the Secrets Manager endpoint (e.g. LocalStack)
    #[arg(long, env = "SM_LOGIN_ENDPOINT_URL", global = true)]
    pub endpoint_url: Option<String>,

    /// Path to a config file
    #[arg(long, env = "SM_LOGIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Flag and environment values for config resolution.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            secret_name: self.secret_name.clone(),
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            config_path: self.config.clone().filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

/// Credential helper actions.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Save credentials read from stdin (not supported; no-op)
    Store,
    /// Print credentials for the server URL read from stdin
    Get,
    /// Remove credentials for the server URL read from stdin (not supported; no-op)
    Erase,
    /// Print all server URLs and their usernames
    List,
    /// Print the helper version
    Version,
}

impl Command {
    /// The protocol action this command runs.
    pub fn action(self) -> Action {
        match self {
            Command::Store => Action::Store,
            Command::Get => Action::Get,
            Command::Erase => Action::Erase,
            Command::List => Action::List,
            Command::Version => Action::Version,
        }
    }
}
