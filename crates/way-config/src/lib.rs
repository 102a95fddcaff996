//! # way-config
//!
//! Layered configuration loading for Waypost using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WAYPOST_*` prefix, `__` as separator)
//! 2. User-level `<config-dir>/waypost/config.toml`
//! 3. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WAYPOST_OAUTH__CLIENT_ID` -> `oauth.client_id`,
//! `WAYPOST_API__BASE_URL` -> `api.base_url`, etc. The `__` (double
//! underscore) separates nested config sections. `WAYPOST_CONFIG_DIR`
//! relocates the config file (and the credential store next to it).
//!
//! # Usage
//!
//! ```no_run
//! use way_config::WaypostConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = WaypostConfig::load_with_dotenv().expect("config");
//!
//! if config.oauth.is_configured() {
//!     println!("client id: {}", config.oauth.client_id);
//! }
//! ```

mod api;
mod error;
mod general;
mod oauth;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use oauth::OAuthConfig;

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Relocates the configuration directory when set and non-empty.
pub const CONFIG_DIR_ENV_VAR: &str = "WAYPOST_CONFIG_DIR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WaypostConfig {
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl WaypostConfig {
    /// Load configuration from all sources (TOML file + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`WaypostConfig::load_with_dotenv`] if
    /// you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to merge or extract.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to merge or extract.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.merge(Env::prefixed("WAYPOST_").split("__"))
    }

    /// Path to the user config file, honoring the directory override.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            if !dir.is_empty() {
                return Some(PathBuf::from(dir).join("config.toml"));
            }
        }
        dirs::config_dir().map(|p| p.join("waypost").join("config.toml"))
    }
}
