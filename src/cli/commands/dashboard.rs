//! `ferp dashboard` - headline figures

use console::style;
use miette::Result;

use crate::cli::output::print_serialized;
use crate::cli::{CliContext, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::role::Section;

pub async fn run(config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    ctx.require(Section::Dashboard)?;

    let stats = ctx
        .console
        .dashboard_stats()
        .await
        .map_err(|e| ctx.fail(e))?;

    if print_serialized(&stats, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Tsv {
        println!("total\tpending\tsent_today\tapproval_rate");
        println!(
            "{}\t{}\t{}\t{:.1}",
            stats.total_sample_requests,
            stats.pending_samples,
            stats.sent_today,
            stats.approval_rate_percentage
        );
        return Ok(());
    }

    println!("{}", style("─".repeat(40)).dim());
    println!(
        "{:<24} {}",
        style("Total sample requests").bold(),
        style(stats.total_sample_requests).cyan()
    );
    println!(
        "{:<24} {}",
        style("Pending samples").bold(),
        style(stats.pending_samples).yellow()
    );
    println!(
        "{:<24} {}",
        style("Sent today").bold(),
        style(stats.sent_today).cyan()
    );
    println!(
        "{:<24} {}",
        style("Approval rate").bold(),
        style(format!("{:.1}%", stats.approval_rate_percentage)).green()
    );
    println!("{}", style("─".repeat(40)).dim());
    Ok(())
}
