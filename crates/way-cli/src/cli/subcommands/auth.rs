use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in via the browser authorization flow.
    Login(AuthLoginArgs),
    /// Delete the stored credential.
    Logout,
    /// Show current auth status.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Print the authorization URL instead of launching a browser.
    #[arg(long)]
    pub no_browser: bool,
}
