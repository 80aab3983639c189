//! credentials::decode
//!
//! Decoding of secret payloads into a [`SecretMap`].
//!
//! # Format
//!
//! The payload is a JSON object whose keys are registry URLs and whose values
//! are credential objects with exactly two string fields:
//!
//! ```json
//! {
//!   "https://index.docker.io/v1/": { "Username": "alice", "Password": "s3cret" }
//! }
//! ```
//!
//! Lowercase `username` / `password` are accepted as aliases. Anything else
//! (bare strings, missing fields, wrong types, extra fields) rejects the
//! whole payload; there is no partial success.
//!
//! # Security
//!
//! Decode errors never echo payload content. serde's "invalid type" messages
//! quote the offending value, so data errors are reported by position only.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::error::Category;
use thiserror::Error;

use crate::secrets::SecretPayload;

/// Errors from decoding a secret payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("secret payload is not valid JSON: {0}")]
    Syntax(String),

    /// The payload is JSON but not an object of credential objects.
    #[error("secret payload does not match the credential schema: {0}")]
    Schema(String),
}

/// A username/password pair for one registry.
///
/// Immutable once decoded. `Debug` output redacts the password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    #[serde(rename = "Username", alias = "username")]
    username: String,
    #[serde(rename = "Password", alias = "password")]
    password: String,
}

impl Credential {
    /// Create a credential.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// A credential with empty username and password.
    pub fn empty() -> Self {
        Self::new("", "")
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether both fields are empty strings.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// Split into `(username, password)`.
    pub fn into_parts(self) -> (String, String) {
        (self.username, self.password)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Decoded secret: registry URL → credential.
///
/// Built fresh for every lookup and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretMap(BTreeMap<String, Credential>);

impl SecretMap {
    /// Credential for `server_url`, if present.
    pub fn get(&self, server_url: &str) -> Option<&Credential> {
        self.0.get(server_url)
    }

    /// Take the credential for `server_url` out of the map.
    pub fn remove(&mut self, server_url: &str) -> Option<Credential> {
        self.0.remove(server_url)
    }

    /// Project to `url → username`. Passwords are dropped.
    pub fn usernames(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(url, cred)| (url.clone(), cred.username.clone()))
            .collect()
    }

    /// Registry URLs present in the secret.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Credential)> for SecretMap {
    fn from_iter<I: IntoIterator<Item = (String, Credential)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode a payload into a [`SecretMap`].
///
/// # Errors
///
/// - `Syntax` if the payload is not valid JSON (including truncation)
/// - `Schema` if any entry is not a `{Username, Password}` object
pub fn decode(payload: &SecretPayload) -> Result<SecretMap, DecodeError> {
    serde_json::from_slice(payload.as_bytes()).map_err(|e| match e.classify() {
        Category::Data => DecodeError::Schema(describe_data_error(&e)),
        Category::Syntax | Category::Eof | Category::Io => DecodeError::Syntax(format!(
            "line {} column {}",
            e.line(),
            e.column()
        )),
    })
}

/// Position plus serde's message when the message cannot carry a value.
fn describe_data_error(e: &serde_json::Error) -> String {
    let message = e.to_string();
    if message.starts_with("missing field") || message.starts_with("unknown field") {
        message
    } else {
        format!(
            "expected an object of {{Username, Password}} objects at line {} column {}",
            e.line(),
            e.column()
        )
    }
}
