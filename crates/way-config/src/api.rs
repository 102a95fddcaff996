//! Upstream API endpoint configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.foursquare.com/v2".to_string()
}

/// Date-stamped API version sent as the `v` query parameter.
fn default_version() -> String {
    "20240601".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
        }
    }
}
