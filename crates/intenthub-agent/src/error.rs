//! Agent error types.
//!
//! Adapter failures never show up here: they travel as data inside
//! [`ServiceResult`](intenthub_adapters::ServiceResult).  What remains is
//! bad input and setup problems.

use std::path::PathBuf;

/// Unified error type for the hub.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // -- Input ---------------------------------------------------------------
    /// The request text was empty or whitespace.
    #[error("No query provided")]
    EmptyInput,

    // -- Configuration -------------------------------------------------------
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`HubConfig`](crate::HubConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("config error: {reason}")]
    ConfigError { reason: String },

    // -- Upstream crate errors -----------------------------------------------
    /// The pattern catalog failed to compile.
    #[error("intent error: {0}")]
    Intent(#[from] intenthub_intent::IntentError),

    /// An adapter could not be constructed or connected.
    #[error("adapter error: {0}")]
    Adapter(#[from] intenthub_adapters::AdapterError),
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;
