mod render;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calsync_core::{Credentials, SyncConfig, Syncer};
use chrono::Utc;
use clap::Parser;
use owo_colors::OwoColorize;

use crate::render::{PlanRender, Render};
use crate::utils::tui;

#[derive(Parser)]
#[command(name = "calsync")]
#[command(about = "Mirror an iCalendar feed into the remote events API")]
struct Cli {
    /// Show what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Path to a config file (defaults to ~/.config/calsync/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List every event even when there are many changes
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SyncConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(feed_url = %config.feed_url, api_url = %config.api_url, "Loaded configuration");

    let credentials = Credentials::from_env()?;
    let syncer = Syncer::from_config(&config, credentials);

    let plan = tui::spin_while("Reading feed and remote events", syncer.plan(Utc::now())).await?;

    println!("{}", plan.render_plan(cli.verbose));

    if cli.dry_run {
        if !plan.is_empty() {
            println!("\n{}", "Dry run: nothing was written".dimmed());
        }
        return Ok(());
    }

    if plan.is_empty() {
        return Ok(());
    }

    let stats = syncer
        .apply(&plan)
        .await
        .context("Sync aborted; writes before the failure were kept")?;

    println!("\n{}", stats.render());

    Ok(())
}
