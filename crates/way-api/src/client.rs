//! Authenticated client for the v2 REST API.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use way_auth::AuthProbe;

use crate::error::ApiError;
use crate::models::{CheckinPage, CheckinsResponse, Envelope};

const API_BASE_URL: &str = "https://api.foursquare.com/v2";

/// Date-stamped API version sent as the `v` query parameter.
const API_VERSION: &str = "20240601";

/// 30s allows for slow API responses while still failing fast enough.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const SELF_PATH: &str = "/users/self";
const SELF_CHECKINS_PATH: &str = "/users/self/checkins";

/// API client. Clone is cheap - `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    version: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the production endpoints, without a token yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_endpoints(API_BASE_URL, API_VERSION)
    }

    /// Create a client against explicit endpoints (config override, tests).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn with_endpoints(
        base_url: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            version: version.into(),
            token: None,
        })
    }

    /// Attach the bearer token used for authenticated calls.
    #[must_use]
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// One page of the authenticated user's check-in history, newest first.
    ///
    /// # Errors
    ///
    /// `MissingToken` without a token; `Api` on a non-200 envelope; `Http` /
    /// `Decode` on transport or payload-shape failures.
    pub async fn self_checkins(&self, limit: u32, offset: u32) -> Result<CheckinPage, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        let extra = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let payload: CheckinsResponse = self.get(SELF_CHECKINS_PATH, token, &extra).await?;
        Ok(payload.checkins)
    }

    /// GET an envelope-wrapped endpoint and unwrap its payload.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        extra: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "api request");

        let response = self
            .client
            .get(&url)
            .query(&[("oauth_token", token), ("v", self.version.as_str())])
            .query(extra)
            .send()
            .await?;

        let envelope: Envelope = response.json().await?;
        if envelope.meta.code != 200 {
            return Err(ApiError::Api {
                code: envelope.meta.code,
                error_type: envelope
                    .meta
                    .error_type
                    .unwrap_or_else(|| "unknown".to_string()),
                detail: envelope.meta.error_detail.unwrap_or_default(),
            });
        }

        Ok(serde_json::from_value(envelope.response)?)
    }
}

impl AuthProbe for ApiClient {
    /// Minimal authenticated call: fetch the user profile, report yes or no.
    fn probe(&self, token: &str) -> impl Future<Output = bool> + Send {
        async move {
            match self.get::<serde_json::Value>(SELF_PATH, token, &[]).await {
                Ok(_) => true,
                Err(error) => {
                    tracing::debug!(%error, "auth probe failed");
                    false
                }
            }
        }
    }
}
