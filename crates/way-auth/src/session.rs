use std::future::Future;

use crate::error::AuthError;
use crate::token_store::TokenStore;

/// Direct bearer-token override; bypasses the store entirely when set.
pub const TOKEN_ENV_VAR: &str = "WAYPOST_AUTH__TOKEN";

/// The minimal authenticated call an API client must offer so `check_auth`
/// can ask the provider whether a token is actually accepted.
pub trait AuthProbe {
    /// `true` iff the provider was reachable and accepted the token.
    fn probe(&self, token: &str) -> impl Future<Output = bool> + Send;
}

/// Decides which bearer token each API-backed operation uses.
///
/// Constructed once per process with an injected [`TokenStore`] and passed to
/// whichever command needs it, so tests can substitute a temp-dir store.
pub struct Session {
    store: TokenStore,
}

impl Session {
    #[must_use]
    pub const fn new(store: TokenStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Resolve the credential for an API call.
    ///
    /// Priority: explicit caller-supplied token, then [`TOKEN_ENV_VAR`], then
    /// the stored record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when all three tiers are empty,
    /// and propagates store read failures (including `StorageCorrupt`).
    pub fn resolve_token(&self, explicit: Option<&str>) -> Result<String, AuthError> {
        if let Some(token) = explicit {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                return Ok(token);
            }
        }

        match self.store.load()? {
            Some(record) => Ok(record.access_token),
            None => Err(AuthError::NotAuthenticated),
        }
    }

    /// Which tier `resolve_token` would use (for status display).
    #[must_use]
    pub fn token_source(&self, explicit: Option<&str>) -> Option<&'static str> {
        if explicit.is_some_and(|token| !token.is_empty()) {
            return Some("flag");
        }
        if std::env::var(TOKEN_ENV_VAR).is_ok_and(|token| !token.is_empty()) {
            return Some("env");
        }
        if self.store.exists() {
            return Some("store");
        }
        None
    }

    /// Local time check against the stored record. No network.
    ///
    /// False when no record exists or the record's lifetime has elapsed; a
    /// record without a lifetime is always valid. Not equivalent to
    /// [`Session::check_auth`], which costs a round trip and is authoritative.
    #[must_use]
    pub fn is_token_valid(&self) -> bool {
        matches!(self.store.load(), Ok(Some(record)) if record.is_valid())
    }

    /// Best-effort network probe with the resolved token.
    ///
    /// Never propagates: a missing credential, a transport failure, and a
    /// provider rejection all collapse to `false`.
    pub async fn check_auth(&self, probe: &impl AuthProbe, explicit: Option<&str>) -> bool {
        match self.resolve_token(explicit) {
            Ok(token) => probe.probe(&token).await,
            Err(error) => {
                tracing::debug!(%error, "check_auth: no usable credential");
                false
            }
        }
    }
}
