//! `ferp login`, `ferp logout`, `ferp whoami`

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use miette::{IntoDiagnostic, Result};
use std::io::IsTerminal;

use crate::cli::output::print_serialized;
use crate::cli::{CliContext, GlobalOpts};
use crate::console::FormError;
use crate::core::config::Config;
use crate::entities::user::LoginRequest;

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Account email (prompted for when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long, env = "FERP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run_login(args: LoginArgs, config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    let interactive = std::io::stdin().is_terminal();
    let theme = ColorfulTheme::default();

    let email = match args.email {
        Some(email) => email,
        None if interactive => Input::<String>::with_theme(&theme)
            .with_prompt("Email")
            .interact_text()
            .into_diagnostic()?,
        None => miette::bail!("--email is required when not running in a terminal"),
    };
    let password = match args.password {
        Some(password) => password,
        None if interactive => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()
            .into_diagnostic()?,
        None => miette::bail!("--password or FERP_PASSWORD is required when not running in a terminal"),
    };

    let user = ctx
        .console
        .login(&LoginRequest { email, password })
        .await
        .map_err(|e| match e {
            // A 401 here means bad credentials, not an expired session
            FormError::Rejected { message, .. } => miette::miette!("{}", message),
            invalid => ctx.fail(invalid),
        })?;
    ctx.save_session()?;

    println!(
        "{} Signed in as {} ({})",
        style("✓").green(),
        style(&user.name).cyan(),
        style(user.role).yellow()
    );
    Ok(())
}

pub fn run_logout(config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    let was_signed_in = ctx.console.session().is_authenticated();
    ctx.console.logout();
    ctx.clear_session()?;

    if was_signed_in {
        println!("{} Signed out", style("✓").green());
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub fn run_whoami(config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    let session = ctx.console.session().snapshot();
    let Some(user) = session.user() else {
        miette::bail!(help = "Run `ferp login` to sign in", "Not signed in");
    };

    if print_serialized(user, global.format)? {
        return Ok(());
    }
    println!("{}: {}", style("Name").bold(), style(&user.name).cyan());
    println!("{}: {}", style("Email").bold(), user.email);
    println!("{}: {}", style("Role").bold(), style(user.role).yellow());
    println!("{}: {}", style("API").dim(), ctx.console.api().base_url());
    Ok(())
}
