//! CLI argument definitions for IntentHub.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use intenthub_agent::BackendKind;

/// IntentHub -- enterprise RAG and workflow hub.
#[derive(Parser)]
#[command(
    name = "intenthub",
    version,
    about = "IntentHub -- enterprise RAG and workflow hub",
    long_about = "Routes free-text requests to BigQuery and Cloud Storage, extracts \
                  fields from sample documents, and answers questions about them."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file (defaults to `config/default.toml`).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Override `backend.kind` (`gcp` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one request and print the response as JSON.
    Process {
        /// The request text.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Answer a question from the knowledge base.
    Ask {
        /// Run the sample-data workflow first so the knowledge base is
        /// populated.
        #[arg(long)]
        seed: bool,

        /// The question.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        question: Vec<String>,
    },

    /// Run the three demo queries and print the report.
    Demo,

    /// Show adapter health and knowledge summary.
    Status,

    /// Start the web server with the embedded dashboard.
    Serve {
        /// Address to bind to (overrides `web.bind`).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides `web.port`).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Interactive prompt over one long-lived hub.
    Repl,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_joins_trailing_words() {
        let cli = Cli::try_parse_from(["intenthub", "process", "Show", "me", "my", "datasets"])
            .unwrap();
        match cli.command {
            Commands::Process { text } => assert_eq!(text.join(" "), "Show me my datasets"),
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "intenthub",
            "status",
            "--backend",
            "memory",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.global.backend, Some(BackendKind::Memory));
        assert_eq!(cli.global.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["intenthub", "--backend", "azure", "demo"]).is_err());
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["intenthub", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { bind, port } => {
                assert_eq!(bind, None);
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["intenthub", "ask", "--seed"]).is_err());
    }
}
