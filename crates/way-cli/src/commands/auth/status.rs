use serde::Serialize;
use way_auth::{Session, TokenStore};
use way_api::ApiClient;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    /// Verdict of the network probe; false on any transport failure.
    authenticated: bool,
    token_present: bool,
    /// Local expiry check against the stored record only.
    token_valid: bool,
    token_source: Option<String>,
    expires_at: Option<String>,
    note: Option<String>,
}

pub async fn handle(
    flags: &GlobalFlags,
    config: &way_config::WaypostConfig,
) -> anyhow::Result<()> {
    let session = Session::new(TokenStore::open_default()?);
    let explicit = flags.token.as_deref();

    let token_source = session.token_source(explicit).map(String::from);
    let token_present = token_source.is_some();

    let (token_valid, expires_at, mut note) = match session.store().load() {
        Ok(Some(record)) => (
            record.is_valid(),
            record.expires_at_ms().map(super::format_epoch_ms),
            None,
        ),
        Ok(None) => (false, None, None),
        Err(error) => (false, None, Some(error.to_string())),
    };

    let authenticated = if token_present {
        let client = ApiClient::with_endpoints(
            config.api.base_url.clone(),
            config.api.version.clone(),
        )?;
        session.check_auth(&client, explicit).await
    } else {
        note.get_or_insert_with(|| "no credential found — run `wpt auth login`".to_string());
        false
    };

    output(
        &AuthStatusResponse {
            authenticated,
            token_present,
            token_valid,
            token_source,
            expires_at,
            note,
        },
        flags.format,
    )
}
