//! Tracing setup for the CLI

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing on stderr
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and
/// dependencies stay at `warn`.
pub fn init_tracing(level: &str) {
    let default_directive = format!("warn,ferp={}", level);
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Map `-v` repetitions onto a level, keeping the configured one at zero
pub fn level_for_verbosity(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
