//! helper
//!
//! Binding of the lookup service to the Docker credential-helper protocol.
//!
//! # Architecture
//!
//! - [`CredentialSource`]: the narrow, read-only contract the core satisfies
//! - [`CredentialHelper`]: the wide contract the host protocol requires
//! - [`ReadOnlyHelper`]: adapter from the first to the second; writes are
//!   logged no-ops
//! - [`serve`]: one protocol action over a reader/writer pair
//!
//! # Example
//!
//! ```ignore
//! use sm_login::helper::{serve, Action, ReadOnlyHelper};
//!
//! let helper = ReadOnlyHelper::new(service);
//! serve(&helper, Action::Get, std::io::stdin(), std::io::stdout()).await?;
//! ```

mod protocol;
mod traits;

pub use protocol::{serve, write_version, Action, HELPER_NAME, HELPER_VERSION};
pub use traits::{
    CredentialHelper, CredentialSource, HelperError, HostCredentials, ReadOnlyHelper,
    CREDENTIALS_NOT_FOUND,
};
