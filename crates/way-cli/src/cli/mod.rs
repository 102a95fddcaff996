use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `wpt` binary.
#[derive(Debug, Parser)]
#[command(name = "wpt", version, about = "Waypost - your check-in history from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Bearer token to use instead of the stored credential
    #[arg(short, long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            token: self.token.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::AuthCommands;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["wpt", "--format", "table", "--verbose", "checkins"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Checkins(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["wpt", "auth", "status", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthCommands::Status
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["wpt", "--format", "xml", "checkins"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn checkins_paging_flags_parse() {
        let cli = Cli::try_parse_from(["wpt", "checkins", "--limit", "50", "--offset", "100"])
            .expect("cli should parse");

        let Commands::Checkins(args) = cli.command else {
            panic!("expected checkins");
        };
        assert_eq!(args.limit, Some(50));
        assert_eq!(args.offset, 100);
    }

    #[test]
    fn login_accepts_no_browser() {
        let cli = Cli::try_parse_from(["wpt", "auth", "login", "--no-browser"])
            .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Login(args),
        } = cli.command
        else {
            panic!("expected auth login");
        };
        assert!(args.no_browser);
    }

    #[test]
    fn token_flag_is_extracted_into_global_flags() {
        let cli = Cli::try_parse_from(["wpt", "--token", "tok_explicit", "checkins"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.token.as_deref(), Some("tok_explicit"));
    }
}
