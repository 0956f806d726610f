//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod context;
pub mod helpers;
pub mod output;
pub mod table;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
pub use context::CliContext;

use miette::Result;

use crate::core::config::Config;

/// Run a parsed command line
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Login(args) => commands::auth::run_login(args, config, &global).await,
        Commands::Logout => commands::auth::run_logout(config, &global),
        Commands::Whoami => commands::auth::run_whoami(config, &global),
        Commands::Dashboard => commands::dashboard::run(config, &global).await,
        Commands::Buyer(cmd) => commands::buyer::run(cmd, config, &global).await,
        Commands::Inv(cmd) => commands::inv::run(cmd, config, &global).await,
        Commands::Req(cmd) => commands::req::run(cmd, config, &global).await,
        Commands::Completions(args) => commands::completions::run(args),
    }
}
