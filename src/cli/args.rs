//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::auth::LoginArgs;
use crate::cli::commands::buyer::BuyerCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::inv::InvCommands;
use crate::cli::commands::req::ReqCommands;

#[derive(Parser, Debug)]
#[command(
    name = "ferp",
    version,
    about = "Fabric ERP admin console",
    long_about = "Manage buyers, fabric inventory and sample requests on a fabric ERP backend.\n\n\
                  Sign in with `ferp login`; the session is kept until `ferp logout`.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Backend base URL (overrides config and FERP_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for lists, details for single records
    #[default]
    Auto,
    /// Bordered table
    Table,
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    Json,
    Yaml,
    /// Record IDs only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in to the backend
    Login(LoginArgs),

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show headline sample request figures
    Dashboard,

    /// Buyer management (admin only)
    #[command(subcommand)]
    Buyer(BuyerCommands),

    /// Fabric inventory
    #[command(subcommand)]
    Inv(InvCommands),

    /// Sample requests and item status workflow
    #[command(subcommand)]
    Req(ReqCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ferp", "dashboard", "--format", "json", "-vv"]).unwrap();
        assert_eq!(cli.global.format, OutputFormat::Json);
        assert_eq!(cli.global.verbose, 2);
        assert!(matches!(cli.command, Commands::Dashboard));
    }
}
