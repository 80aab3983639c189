//! helper::protocol
//!
//! Docker credential-helper wire protocol.
//!
//! The host runs the helper once per request with the action as its only
//! argument and exchanges one message over stdin/stdout:
//!
//! | Action    | stdin                  | stdout                                   |
//! |-----------|------------------------|------------------------------------------|
//! | `store`   | `HostCredentials` JSON | nothing                                  |
//! | `get`     | server URL             | `{"ServerURL","Username","Secret"}` JSON |
//! | `erase`   | server URL             | nothing                                  |
//! | `list`    | nothing                | `{"<url>": "<username>"}` JSON           |
//! | `version` | nothing                | `sm-login <version>`                     |
//!
//! On failure the caller writes the error's message to stdout and exits
//! non-zero; see `cli::run`.

use std::io::{Read, Write};

use tracing::debug;

use super::traits::{CredentialHelper, HelperError, HostCredentials};

/// Name reported by the `version` action.
pub const HELPER_NAME: &str = "sm-login";

/// Version reported by the `version` action.
pub const HELPER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A protocol action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Store,
    Get,
    Erase,
    List,
    Version,
}

impl Action {
    /// All actions, in protocol order.
    pub fn all() -> &'static [Action] {
        &[
            Action::Store,
            Action::Get,
            Action::Erase,
            Action::List,
            Action::Version,
        ]
    }

    /// The action name as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Store => "store",
            Action::Get => "get",
            Action::Erase => "erase",
            Action::List => "list",
            Action::Version => "version",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Action {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::all()
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| HelperError::UnknownAction(s.to_string()))
    }
}

/// Run one protocol action against `helper`.
///
/// # Errors
///
/// Protocol validation errors (`MissingServerUrl`, `MissingUsername`,
/// `InvalidInput`), I/O errors, and whatever the helper returns.
pub async fn serve<H, R, W>(
    helper: &H,
    action: Action,
    mut input: R,
    mut output: W,
) -> Result<(), HelperError>
where
    H: CredentialHelper + ?Sized,
    R: Read,
    W: Write,
{
    debug!(%action, "serving credential helper action");
    match action {
        Action::Store => {
            let creds = read_credentials(&mut input)?;
            helper.store(&creds).await
        }
        Action::Get => {
            let server_url = read_server_url(&mut input)?;
            let (username, secret) = helper.get(&server_url).await?;
            let response = HostCredentials {
                server_url,
                username,
                secret,
            };
            serde_json::to_writer(&mut output, &response)
                .map_err(|e| HelperError::Io(e.into()))?;
            writeln!(output)?;
            Ok(())
        }
        Action::Erase => {
            let server_url = read_server_url(&mut input)?;
            helper.delete(&server_url).await
        }
        Action::List => {
            let listing = helper.list().await?;
            serde_json::to_writer(&mut output, &listing).map_err(|e| HelperError::Io(e.into()))?;
            writeln!(output)?;
            Ok(())
        }
        Action::Version => Ok(write_version(output)?),
    }
}

/// Write the `version` response.
pub fn write_version<W: Write>(mut output: W) -> std::io::Result<()> {
    writeln!(output, "{} {}", HELPER_NAME, HELPER_VERSION)
}

/// Read a server URL, trimming surrounding whitespace.
fn read_server_url<R: Read>(input: &mut R) -> Result<String, HelperError> {
    let mut buf = String::new();
    input.read_to_string(&mut buf)?;
    let server_url = buf.trim();
    if server_url.is_empty() {
        return Err(HelperError::MissingServerUrl);
    }
    Ok(server_url.to_string())
}

/// Read and validate a store request.
fn read_credentials<R: Read>(input: &mut R) -> Result<HostCredentials, HelperError> {
    let creds: HostCredentials = serde_json::from_reader(input).map_err(|e| {
        HelperError::InvalidInput(format!(
            "credentials are not valid JSON at line {} column {}",
            e.line(),
            e.column()
        ))
    })?;
    if creds.server_url.is_empty() {
        return Err(HelperError::MissingServerUrl);
    }
    if creds.username.is_empty() {
        return Err(HelperError::MissingUsername);
    }
    Ok(creds)
}
