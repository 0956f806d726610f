use clap::Parser;
use miette::Result;
use ferp::cli::Cli;
use ferp::core::config::Config;
use ferp::core::logging::{init_tracing, level_for_verbosity};

#[tokio::main]
async fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    // Broken config falls back to defaults; warn once tracing is up
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::from_env(), Some(e)),
    };
    init_tracing(&level_for_verbosity(cli.global.verbose, &config.log_level));
    if let Some(e) = load_error {
        tracing::warn!("{}; using defaults", e);
    }

    ferp::cli::run(cli, config).await
}
