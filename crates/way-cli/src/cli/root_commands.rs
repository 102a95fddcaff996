use clap::Subcommand;

use super::subcommands::{AuthCommands, CheckinsArgs};

/// All `wpt` subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in, log out, inspect credential status.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// List your check-in history.
    Checkins(CheckinsArgs),
}
