//! credentials
//!
//! Credential lookup over a remote secret.
//!
//! # Architecture
//!
//! - `decode`: payload → [`SecretMap`] with strict schema checks
//! - `errors`: the [`LookupError`] taxonomy and fetch-error classification
//! - `service`: [`LookupService`], the allow-list / fetch / decode / select
//!   orchestration
//!
//! # Invariants
//!
//! 1. URLs outside the supported set fail before any remote call
//! 2. Every lookup re-fetches; decoded maps are never cached
//! 3. Decoding is all-or-nothing
//! 4. `list` never exposes passwords

mod decode;
mod errors;
mod service;

pub use decode::{decode, Credential, DecodeError, SecretMap};
pub use errors::LookupError;
pub use service::{LookupService, MissPolicy, SupportedUrls, DOCKER_HUB_URL};
