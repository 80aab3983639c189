//! core
//!
//! Configuration and local path handling shared by the CLI.
//!
//! - [`config`]: file schema, precedence rules, validation
//! - [`paths`]: cache, config and log file locations

pub mod config;
pub mod paths;
