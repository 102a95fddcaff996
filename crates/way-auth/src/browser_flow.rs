//! The OAuth2 authorization-code flow against a loopback redirect.
//!
//! One flow owns the callback port for its whole lifetime:
//!
//! 1. Bind `127.0.0.1:6473` (fail fast on a port conflict)
//! 2. Open the browser at the provider's consent page
//! 3. Wait for the redirect (in `spawn_blocking` — `tiny_http::recv` blocks)
//! 4. Exchange the code for an access token
//! 5. Persist the credential, answer the browser, release the port

use std::borrow::Cow;
use std::net::TcpListener;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::error::AuthError;
use crate::record::CredentialRecord;
use crate::token_store::TokenStore;

/// Fixed loopback port. `http://localhost:6473/callback` must be registered
/// with the provider as an allowed redirect URI.
pub const CALLBACK_PORT: u16 = 6473;
pub const CALLBACK_PATH: &str = "/callback";

const AUTHORIZE_URL: &str = "https://foursquare.com/oauth2/authenticate";
const TOKEN_URL: &str = "https://foursquare.com/oauth2/access_token";

/// Hard ceiling on waiting for the provider redirect.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Grace period between the final response and dropping the listener, so the
/// browser finishes rendering the page before the port goes away.
const RESPONSE_LINGER: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub client_id: String,
    pub client_secret: String,
    pub port: u16,
    pub authorize_url: String,
    pub token_url: String,
    pub timeout: Duration,
    /// `false` prints the authorization URL without launching a browser
    /// (`--no-browser`, headless tests).
    pub open_browser: bool,
}

impl FlowConfig {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            port: CALLBACK_PORT,
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            timeout: CALLBACK_TIMEOUT,
            open_browser: true,
        }
    }

    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}{CALLBACK_PATH}", self.port)
    }

    fn authorize_request_url(&self) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri()),
        )
    }
}

/// Run the complete interactive login flow and persist the credential.
///
/// # Errors
///
/// `MissingClientCredentials` before any listener or network activity when
/// either credential is empty; `ListenerBind` when the port is taken;
/// `Provider` when the provider redirects with an error or rejects the
/// exchange; `MissingCode` when the redirect carries neither outcome;
/// `FlowTimeout` when no callback arrives in time; `StorageWrite` when the
/// credential cannot be persisted. Every failure path closes the listener
/// before returning.
pub async fn login(config: &FlowConfig, store: &TokenStore) -> Result<CredentialRecord, AuthError> {
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        return Err(AuthError::MissingClientCredentials);
    }

    let listener = TcpListener::bind(("127.0.0.1", config.port)).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            AuthError::ListenerBind(config.port)
        } else {
            AuthError::Other(format!("failed to bind 127.0.0.1:{}: {e}", config.port))
        }
    })?;
    let server = tiny_http::Server::from_listener(listener, None)
        .map_err(|e| AuthError::Other(format!("failed to start callback listener: {e}")))?;

    let authorize_url = config.authorize_request_url();
    eprintln!("Authorize Waypost in your browser: {authorize_url}");
    if config.open_browser {
        if let Err(error) = open::that(&authorize_url) {
            tracing::warn!(%error, "could not launch a browser");
            eprintln!("Could not open a browser automatically. Open the URL above manually, then return here.");
        }
    }

    let timeout = config.timeout;
    let (server, request, code) =
        tokio::task::spawn_blocking(move || wait_for_code(&server, timeout).map(|(r, c)| (server, r, c)))
            .await
            .map_err(|e| AuthError::Other(format!("callback task join: {e}")))??;

    match exchange_code(config, &code).await {
        Ok(record) => match store.save(&record) {
            Ok(()) => {
                respond_html(request, success_page(), 200);
                close_after_linger(server).await;
                Ok(record)
            }
            Err(error) => {
                respond_html(request, error_page("the credential could not be saved"), 500);
                close_after_linger(server).await;
                Err(error)
            }
        },
        Err(error) => {
            respond_html(request, error_page(&error.to_string()), 502);
            close_after_linger(server).await;
            Err(error)
        }
    }
}

enum CallbackOutcome {
    Code(String),
    ProviderError(String),
    Missing,
}

/// Block until the callback delivers a terminal outcome or the deadline hits.
///
/// The root path gets the static waiting page and stray requests (favicon and
/// friends) get a 404; both keep the loop going. Returning on the first
/// terminal outcome is what guarantees the callback is handled at most once:
/// either the error paths drop the server with this frame, or the success
/// path hands it back to the caller, which stops receiving.
fn wait_for_code(
    server: &tiny_http::Server,
    timeout: Duration,
) -> Result<(tiny_http::Request, String), AuthError> {
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(AuthError::FlowTimeout(timeout.as_secs()));
        }

        let request = match server.recv_timeout(remaining) {
            Ok(Some(request)) => request,
            Ok(None) => return Err(AuthError::FlowTimeout(timeout.as_secs())),
            Err(e) => return Err(AuthError::Other(format!("callback listener recv: {e}"))),
        };

        let url = request.url().to_string();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url.as_str(), ""),
        };

        if path == "/" {
            respond_html(request, waiting_page(), 200);
            continue;
        }
        if path != CALLBACK_PATH {
            respond_html(request, not_found_page(), 404);
            continue;
        }

        match parse_callback_query(query) {
            CallbackOutcome::ProviderError(message) => {
                respond_html(request, error_page(&message), 400);
                return Err(AuthError::Provider(message));
            }
            CallbackOutcome::Missing => {
                respond_html(
                    request,
                    error_page("the provider sent neither a code nor an error"),
                    400,
                );
                return Err(AuthError::MissingCode);
            }
            CallbackOutcome::Code(code) => return Ok((request, code)),
        }
    }
}

/// Branch on the three redirect outcomes: provider error, missing code, code.
fn parse_callback_query(query: &str) -> CallbackOutcome {
    let mut code = None;
    let mut error = None;

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map(Cow::into_owned)
            .unwrap_or_else(|_| value.to_string());
        match key {
            "code" => code = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }

    if let Some(message) = error {
        return CallbackOutcome::ProviderError(message);
    }
    match code {
        Some(code) if !code.is_empty() => CallbackOutcome::Code(code),
        _ => CallbackOutcome::Missing,
    }
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn exchange_code(config: &FlowConfig, code: &str) -> Result<CredentialRecord, AuthError> {
    let redirect_uri = config.redirect_uri();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri.as_str()),
        ("code", code),
    ];

    let response = reqwest::Client::new()
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| AuthError::Other(format!("token exchange request failed: {e}")))?;

    let payload: TokenExchangeResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Provider(format!("token endpoint returned an unreadable body: {e}")))?;

    if let Some(error) = payload.error {
        let message = match payload.error_description {
            Some(detail) if !detail.is_empty() => format!("{error}: {detail}"),
            _ => error,
        };
        return Err(AuthError::Provider(message));
    }

    let Some(access_token) = payload.access_token.filter(|token| !token.is_empty()) else {
        return Err(AuthError::Provider(
            "token endpoint response had no access_token".into(),
        ));
    };

    Ok(CredentialRecord::issued_now(access_token, payload.expires_in))
}

fn respond_html(request: tiny_http::Request, body: String, status: u16) {
    let response = tiny_http::Response::from_string(body)
        .with_status_code(status)
        .with_header(
            tiny_http::Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap(),
        );
    if let Err(error) = request.respond(response) {
        tracing::debug!(%error, "browser went away before the response was written");
    }
}

async fn close_after_linger(server: tiny_http::Server) {
    tokio::time::sleep(RESPONSE_LINGER).await;
    drop(server);
}

fn waiting_page() -> String {
    page(
        "Waiting for authorization",
        "Finish signing in with this browser, then return to your terminal.",
    )
}

fn success_page() -> String {
    page(
        "Authorized",
        "Waypost received its token. You can close this tab.",
    )
}

fn error_page(message: &str) -> String {
    page("Authorization failed", &escape_html(message))
}

fn not_found_page() -> String {
    page("Not found", "Nothing to see here.")
}

fn page(title: &str, body: &str) -> String {
    format!("<html><body><h1>{title}</h1><p>{body}</p></body></html>")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn callback_with_code_parses() {
        let CallbackOutcome::Code(code) = parse_callback_query("code=abc123") else {
            panic!("expected a code");
        };
        assert_eq!(code, "abc123");
    }

    #[test]
    fn provider_error_wins_over_code() {
        let outcome = parse_callback_query("code=abc123&error=access_denied");
        assert!(matches!(
            outcome,
            CallbackOutcome::ProviderError(message) if message == "access_denied"
        ));
    }

    #[test]
    fn error_message_is_url_decoded() {
        let outcome = parse_callback_query("error=user%20declined%20access");
        assert!(matches!(
            outcome,
            CallbackOutcome::ProviderError(message) if message == "user declined access"
        ));
    }

    #[test]
    fn neither_code_nor_error_is_missing() {
        assert!(matches!(parse_callback_query(""), CallbackOutcome::Missing));
        assert!(matches!(
            parse_callback_query("state=leftover"),
            CallbackOutcome::Missing
        ));
        assert!(matches!(
            parse_callback_query("code="),
            CallbackOutcome::Missing
        ));
    }

    #[test]
    fn redirect_uri_uses_localhost_and_fixed_path() {
        let config = FlowConfig::new("id", "secret");
        assert_eq!(config.redirect_uri(), "http://localhost:6473/callback");
    }

    #[test]
    fn authorize_url_carries_the_three_query_parameters() {
        let config = FlowConfig::new("client-1", "secret");
        let url = config.authorize_request_url();
        assert!(url.starts_with("https://foursquare.com/oauth2/authenticate?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A6473%2Fcallback"));
    }

    #[test]
    fn provider_message_is_escaped_in_error_page() {
        let html = error_page("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
