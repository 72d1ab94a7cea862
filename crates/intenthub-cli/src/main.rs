//! CLI entry point for IntentHub.
//!
//! This binary provides the `intenthub` command: one-shot `process`, `ask`,
//! `demo` and `status`, the `serve` web server, and an interactive `repl`.

mod cli;
mod helpers;
mod repl;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use intenthub_agent::DEMO_QUERIES;
use intenthub_web::{WebConfig, WebServer};

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::helpers::{build_hub, init_tracing, load_config, print_json};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let global = cli.global;

    let outcome = match cli.command {
        Commands::Process { text } => cmd_process(&global, &text.join(" ")).await,
        Commands::Ask { seed, question } => cmd_ask(&global, seed, &question.join(" ")).await,
        Commands::Demo => cmd_demo(&global).await,
        Commands::Status => cmd_status(&global).await,
        Commands::Serve { bind, port } => cmd_serve(&global, bind, port).await,
        Commands::Repl => repl::cmd_repl(&global).await,
    };

    if let Err(ref e) = outcome {
        error!("command failed: {e:#}");
    }
    outcome
}

// ---------------------------------------------------------------------------
// One-shot subcommands
// ---------------------------------------------------------------------------

async fn cmd_process(global: &GlobalArgs, text: &str) -> Result<()> {
    init_tracing("warn");
    let hub = build_hub(global).await?;
    let response = hub.handle(text).await.context("request rejected")?;
    print_json(&response)
}

async fn cmd_ask(global: &GlobalArgs, seed: bool, question: &str) -> Result<()> {
    init_tracing("warn");
    let hub = build_hub(global).await?;
    if seed {
        hub.handle(DEMO_QUERIES[0])
            .await
            .context("failed to seed sample data")?;
    }
    let answer = hub.ask(question).await.context("question rejected")?;
    print_json(&answer)
}

async fn cmd_demo(global: &GlobalArgs) -> Result<()> {
    init_tracing("warn");
    let hub = build_hub(global).await?;
    let report = hub.run_demo().await.context("demo failed")?;
    print_json(&report)
}

async fn cmd_status(global: &GlobalArgs) -> Result<()> {
    init_tracing("warn");
    let hub = build_hub(global).await?;
    print_json(&hub.status().await)
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(global: &GlobalArgs, bind: Option<String>, port: Option<u16>) -> Result<()> {
    init_tracing("info");

    let config = load_config(global)?;
    let mut web = WebConfig::from(&config.web);
    if let Some(bind) = bind {
        web.bind_addr = bind;
    }
    if let Some(port) = port {
        web.port = port;
    }

    let hub = intenthub_agent::HubBuilder::new(config)
        .build()
        .await
        .context("failed to initialise hub")?;

    let server = WebServer::new(web, Arc::new(hub));
    info!(addr = %server.addr(), "IntentHub web server");
    println!("  IntentHub listening on http://{}", server.addr());
    server.start().await.context("web server failed")?;

    info!("web server stopped");
    Ok(())
}
