use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-200 envelope.
    #[error("provider returned {code} ({error_type}): {detail}")]
    Api {
        code: u16,
        error_type: String,
        detail: String,
    },

    /// The envelope was well-formed but its payload was not.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// A call that needs authentication was made on a token-less client.
    #[error("no bearer token set on the client")]
    MissingToken,
}
