//! Provider OAuth application credentials.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OAuthConfig {
    /// OAuth client id of the registered application.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret of the registered application.
    #[serde(default)]
    pub client_secret: String,
}

impl OAuthConfig {
    /// Check whether the browser login flow can run.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!OAuthConfig::default().is_configured());
    }

    #[test]
    fn configured_when_both_values_set() {
        let config = OAuthConfig {
            client_id: "CLIENT123".into(),
            client_secret: "SECRET456".into(),
        };
        assert!(config.is_configured());
    }

    #[test]
    fn not_configured_when_missing_secret() {
        let config = OAuthConfig {
            client_id: "CLIENT123".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
