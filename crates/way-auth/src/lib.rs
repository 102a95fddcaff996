//! # way-auth
//!
//! Browser-based OAuth2 login and credential lifecycle for the Waypost CLI.
//!
//! Provides the authorization-code flow (`tiny_http` loopback listener +
//! `open`), the on-disk credential store (owner-only file under the platform
//! config directory), and session-level token resolution with environment
//! override.

pub mod browser_flow;
pub mod error;
pub mod record;
pub mod session;
pub mod token_store;

pub use error::AuthError;
pub use record::CredentialRecord;
pub use session::{AuthProbe, Session};
pub use token_store::TokenStore;

/// Clear the stored credential.
///
/// Deleting an absent credential is not an error.
///
/// # Errors
///
/// Returns `AuthError::StorageWrite` if the credential file exists but cannot
/// be removed.
pub fn logout() -> Result<(), AuthError> {
    TokenStore::open_default()?.delete()
}
