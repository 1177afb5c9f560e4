//! Headless battle client.
//!
//! Loads battle content from a data directory, lets the autopilot play the
//! allies and prints the outcome as JSON.
//!
//! ```bash
//! BATTLE_SEED=7 BATTLE_PACING=0.5 RUST_LOG=runtime=debug cargo run -p battle-client
//! ```
mod config;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use battle_content::ContentFactory;
use runtime::{AutoPilotProvider, BattleSetup, Runtime};
use tracing_subscriber::EnvFilter;

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = ClientConfig::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Seed: {}", config.seed);

    let bundle = ContentFactory::new(&config.data_dir)
        .load_bundle()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    tracing::debug!(
        allies = bundle.roster.allies.len(),
        enemies = bundle.roster.enemies.len(),
        "Content loaded"
    );

    let setup = BattleSetup::new(Arc::new(bundle.roster), Arc::new(bundle.spawns))
        .with_equipment(Arc::new(bundle.equipment))
        .with_config(bundle.config)
        .with_combos(bundle.combos)
        .with_seed(config.seed);

    let mut runtime = Runtime::builder()
        .config(config.runtime_config())
        .setup(setup)
        .provider(AutoPilotProvider)
        .build()
        .await?;

    let outcome = runtime.run().await?;
    runtime.shutdown().await?;

    report::print_outcome(&outcome)
}

/// Logs to stderr so stdout carries only the report.
fn setup_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
