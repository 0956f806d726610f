//! Per-invocation CLI context
//!
//! Loads configuration, restores the saved session and builds the
//! [`Console`] every command works through.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Report, Result};
use std::io::IsTerminal;

use crate::cli::GlobalOpts;
use crate::console::{Console, ConsoleError, FormError, Notice, NoticeLevel};
use crate::core::config::Config;
use crate::core::role::{Role, Section};
use crate::core::session::{Session, SessionHandle, SessionStore};

/// Everything a command needs to talk to the backend
pub struct CliContext {
    pub config: Config,
    pub console: Console,
    store: SessionStore,
}

impl CliContext {
    /// Build the context: config layers, then `--api-url`, then the session
    pub fn new(mut config: Config, global: &GlobalOpts) -> Result<Self> {
        if let Some(url) = &global.api_url {
            config.api_url = url.clone();
        }

        let path = Config::session_path()
            .ok_or_else(|| miette::miette!("Cannot determine a config directory; set FERP_CONFIG_DIR"))?;
        let store = SessionStore::new(path);
        let session = match store.load() {
            Ok(Some(session)) => session,
            Ok(None) => Session::anonymous(),
            Err(e) => {
                tracing::warn!("{}; starting signed out", e);
                Session::anonymous()
            }
        };

        let console = Console::new(&config, SessionHandle::new(session))
            .map_err(|e| miette::miette!("{}", e))?;

        Ok(Self {
            config,
            console,
            store,
        })
    }

    /// Check the signed-in role may use `section`
    pub fn require(&self, section: Section) -> Result<Role> {
        self.console.require(section).map_err(|e| self.fail(e))
    }

    pub fn save_session(&self) -> Result<()> {
        self.store
            .save(&self.console.session().snapshot())
            .into_diagnostic()
    }

    pub fn clear_session(&self) -> Result<()> {
        self.store.clear().into_diagnostic()
    }

    /// Turn a console error into a report, ending the session on a 401
    pub fn fail(&self, err: impl Into<ConsoleError>) -> Report {
        let err = err.into();
        if err.needs_sign_in() {
            if let Err(e) = self.store.clear() {
                tracing::warn!("failed to clear session: {}", e);
            }
            return miette::miette!(
                help = "Run `ferp login` to sign in",
                "Not signed in or session expired"
            );
        }
        match err {
            ConsoleError::AccessDenied { section, role } => miette::miette!(
                help = "Ask an administrator for access",
                "Access denied: {} is not available to {}",
                section,
                role
            ),
            ConsoleError::Form(FormError::Invalid(fields)) => {
                let lines: Vec<String> = fields
                    .iter()
                    .map(|f| format!("  {}: {}", f.field, f.message))
                    .collect();
                miette::miette!("Please correct the following:\n{}", lines.join("\n"))
            }
            other => miette::miette!("{}", other),
        }
    }

    /// Ask a yes/no question
    ///
    /// `--yes` answers for the user. Without a terminal there is nobody to
    /// ask, so the answer is `None`.
    pub fn confirm(&self, prompt: &str, yes: bool) -> Result<Option<bool>> {
        if yes {
            return Ok(Some(true));
        }
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()?;
        Ok(Some(answer))
    }
}

/// Print a notice the way the CLI reports outcomes
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{} {}", style("✓").green(), notice.message),
        NoticeLevel::Info => println!("{} {}", style("•").cyan(), notice.message),
        NoticeLevel::Error => eprintln!("{} {}", style("✗").red(), notice.message),
    }
}
