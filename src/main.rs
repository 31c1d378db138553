// Command-line entry point: one full scrape using ./config.yaml (or defaults).

use anyhow::{Context, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use skillbridge_scrape::{load_yaml_config, scrape};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_yaml_config(Path::new("config.yaml")).context("Failed to read config.yaml")?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current page");
            on_ctrl_c.cancel();
        }
    });

    let report = scrape(&config, cancel).await.context("Scrape failed")?;

    println!(
        "Number of opportunities found: {} ({} locations over {} pages, stopped: {:?})",
        report.dataset.opportunity_count(),
        report.dataset.len(),
        report.pages,
        report.stop_reason
    );
    println!("Data saved to {}", report.output.display());
    Ok(())
}
