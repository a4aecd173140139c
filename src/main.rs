use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedrelay::app::AppContext;
use feedrelay::cli::Cli;
use feedrelay::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        EnvFilter::new("info,feedrelay=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let settings = cli.into_settings();

    let ctx = AppContext::new(settings, config)?;
    let report = ctx.sync_service().run().await?;

    info!(
        fetched = report.fetched,
        delivered = report.delivered,
        "Sync finished"
    );
    Ok(())
}
