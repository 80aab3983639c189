//! sm-login - A Docker credential helper backed by AWS Secrets Manager
//!
//! Docker runs the helper with an action (`get`, `list`, `store`, `erase`,
//! `version`); the helper reads one JSON secret from Secrets Manager that
//! maps registry URLs to `{Username, Password}` objects and answers from it.
//! The helper is read-only: `store` and `erase` succeed without doing
//! anything.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, wires everything)
//! - [`helper`] - Docker credential-helper protocol and read-only adapter
//! - [`credentials`] - Lookup service, secret decoding, error taxonomy
//! - [`secrets`] - Remote secret fetching (AWS Secrets Manager, mock)
//! - [`core`] - Configuration and local paths
//!
//! # Correctness Invariants
//!
//! 1. Registry URLs outside the supported set never trigger a remote fetch
//! 2. Every lookup reads the current secret version; nothing is cached
//! 3. A payload that does not fully match the schema yields no data
//! 4. Passwords never appear in `list` output, logs, or error messages

pub mod cli;
pub mod core;
pub mod credentials;
pub mod helper;
pub mod secrets;
