use serde::Serialize;
use way_auth::TokenStore;
use way_auth::browser_flow::{self, FlowConfig};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    created_at: String,
    expires_at: Option<String>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &way_config::WaypostConfig,
) -> anyhow::Result<()> {
    if !config.oauth.is_configured() {
        anyhow::bail!(
            "auth login: WAYPOST_OAUTH__CLIENT_ID and WAYPOST_OAUTH__CLIENT_SECRET are not configured"
        );
    }

    let store = TokenStore::open_default()?;
    let mut flow = FlowConfig::new(
        config.oauth.client_id.clone(),
        config.oauth.client_secret.clone(),
    );
    flow.open_browser = !args.no_browser;

    let record = browser_flow::login(&flow, &store).await?;

    output(
        &AuthLoginResponse {
            authenticated: true,
            created_at: super::format_epoch_ms(record.created_at),
            expires_at: record.expires_at_ms().map(super::format_epoch_ms),
        },
        flags.format,
    )
}
