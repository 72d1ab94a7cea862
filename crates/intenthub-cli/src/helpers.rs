//! Shared helpers for the CLI subcommands.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use intenthub_agent::{Hub, HubBuilder, HubConfig};

use crate::cli::GlobalArgs;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Install the global subscriber.  `RUST_LOG` wins over `default_level`.
/// Logs go to stderr so JSON on stdout stays parseable.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Configuration and hub
// ---------------------------------------------------------------------------

/// Load the config file, apply environment and command-line overrides.
pub fn load_config(global: &GlobalArgs) -> Result<HubConfig> {
    let mut config = HubConfig::load_with_env(global.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(kind) = global.backend {
        config.backend.kind = kind;
    }
    Ok(config)
}

pub async fn build_hub(global: &GlobalArgs) -> Result<Hub> {
    let config = load_config(global)?;
    let hub = HubBuilder::new(config)
        .build()
        .await
        .context("failed to initialise hub")?;
    info!("hub ready");
    Ok(hub)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
