//! Subcommand: `intenthub repl` -- interactive prompt.
//!
//! One hub lives for the whole session, so knowledge seeded by an earlier
//! request is visible to later questions.  Lines starting with `:` are
//! commands; anything else is processed as a request.

use std::io::{self, BufRead, Write as _};

use anyhow::{Context, Result};
use tracing::info;

use intenthub_agent::{AgentError, Hub, HubResponse};

use crate::cli::GlobalArgs;
use crate::helpers::{build_hub, init_tracing, print_json};

const HELP: &str = "\
  :ask <question>   answer from the knowledge base
  :status           adapter health and knowledge summary
  :history [n]      the last n workflow entries (default 5)
  :json             toggle raw JSON output
  :help             this help
  quit | exit       leave";

/// A parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Empty,
    Quit,
    Help,
    ToggleJson,
    Status,
    History(usize),
    Ask(&'a str),
    Request(&'a str),
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Line::Quit;
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return Line::Request(trimmed);
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(n, r)| (n, r.trim()));
    match name {
        "help" => Line::Help,
        "json" => Line::ToggleJson,
        "status" => Line::Status,
        "history" => Line::History(rest.parse().unwrap_or(5)),
        "ask" => Line::Ask(rest),
        _ => Line::Unknown(name),
    }
}

/// Run the interactive REPL.
pub async fn cmd_repl(global: &GlobalArgs) -> Result<()> {
    init_tracing("info");
    let hub = build_hub(global).await?;

    println!();
    println!("  IntentHub v{}", env!("CARGO_PKG_VERSION"));
    println!("  Type a request, :help for commands, or 'quit' to exit.");
    println!();

    let mut json = false;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else { break };
        let line = line.context("failed to read input")?;

        match parse_line(&line) {
            Line::Empty => {}
            Line::Quit => {
                info!("user requested exit");
                break;
            }
            Line::Help => println!("{HELP}"),
            Line::ToggleJson => {
                json = !json;
                println!("  JSON output {}", if json { "on" } else { "off" });
            }
            Line::Status => print_json(&hub.status().await)?,
            Line::History(n) => {
                for entry in hub.history(Some(n)).await {
                    println!(
                        "  {} [{}] {}",
                        entry.timestamp.format("%H:%M:%S"),
                        entry.response.kind(),
                        entry.input
                    );
                }
            }
            Line::Ask(question) => match hub.ask(question).await {
                Ok(answer) if json => print_json(&answer)?,
                Ok(answer) => println!("  {}", answer.answer),
                Err(AgentError::EmptyInput) => println!("  usage: :ask <question>"),
                Err(e) => return Err(e).context("question failed"),
            },
            Line::Request(text) => handle_request(&hub, text, json).await?,
            Line::Unknown(name) => println!("  unknown command :{name} (try :help)"),
        }
    }

    println!("  Goodbye.");
    Ok(())
}

async fn handle_request(hub: &Hub, text: &str, json: bool) -> Result<()> {
    let response = hub.handle(text).await.context("request failed")?;
    if json {
        return print_json(&response);
    }

    let intent = response.intent();
    let services: Vec<String> = intent
        .required_services
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "  intent: {} ({} confidence, services: {})",
        intent.primary_intent,
        intent.confidence,
        services.join(", ")
    );
    for record in response.service_results() {
        let outcome = match record.result.error() {
            Some(error) => format!("failed: {error}"),
            None => "ok".to_string(),
        };
        println!("  - {}.{}: {outcome}", record.service, record.action);
    }
    if let HubResponse::Analysis { rag_response, .. } = &response {
        println!("  {}", rag_response.answer);
    }
    println!("  {}", response.summary());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
