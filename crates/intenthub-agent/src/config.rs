//! Hub configuration.
//!
//! Loaded from `config/default.toml` (or `--config`), then overridden from
//! the environment.  A missing file means defaults:
//!
//! ```toml
//! [gcp]
//! project_id = "your-project-id"
//! dataset_id = "enterprise_rag"
//! sample_table = "sample_claims"
//! location = "US"
//! # bucket_name = "<project_id>-rag-documents"
//! request_timeout_secs = 30
//!
//! [backend]
//! kind = "gcp"   # or "memory"
//!
//! [history]
//! max_entries = 500
//!
//! [web]
//! bind = "0.0.0.0"
//! port = 8080
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use intenthub_adapters::query::DEFAULT_BIGQUERY_ENDPOINT;
use intenthub_adapters::storage::DEFAULT_STORAGE_ENDPOINT;
use intenthub_adapters::{BigQueryConfig, GcsConfig, QueryAdapterConfig};

use crate::error::{AgentError, Result};

/// Default location of the configuration file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variables consulted by [`HubConfig::apply_env`].
pub mod env {
    pub const PROJECT: &str = "GOOGLE_CLOUD_PROJECT";
    pub const BUCKET: &str = "INTENTHUB_BUCKET";
    pub const BACKEND: &str = "INTENTHUB_BACKEND";
    pub const ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// `[gcp]`: where the managed services live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpSettings {
    pub project_id: String,
    pub dataset_id: String,
    pub sample_table: String,
    pub location: String,
    /// Defaults to `<project_id>-rag-documents` when unset.
    pub bucket_name: Option<String>,
    pub bigquery_endpoint: String,
    pub storage_endpoint: String,
    /// HTTP client timeout for both REST backends.
    pub request_timeout_secs: u64,
    /// OAuth bearer token.  Only ever taken from the environment.
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Default for GcpSettings {
    fn default() -> Self {
        Self {
            project_id: "your-project-id".into(),
            dataset_id: "enterprise_rag".into(),
            sample_table: "sample_claims".into(),
            location: "US".into(),
            bucket_name: None,
            bigquery_endpoint: DEFAULT_BIGQUERY_ENDPOINT.into(),
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.into(),
            request_timeout_secs: 30,
            access_token: None,
        }
    }
}

impl GcpSettings {
    /// The effective bucket name.
    pub fn bucket_name(&self) -> String {
        self.bucket_name
            .clone()
            .unwrap_or_else(|| format!("{}-rag-documents", self.project_id))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn query_adapter_config(&self) -> QueryAdapterConfig {
        QueryAdapterConfig {
            project_id: self.project_id.clone(),
            dataset_id: self.dataset_id.clone(),
            sample_table: self.sample_table.clone(),
            location: self.location.clone(),
        }
    }

    pub fn bigquery_config(&self) -> BigQueryConfig {
        BigQueryConfig {
            endpoint: self.bigquery_endpoint.clone(),
            project_id: self.project_id.clone(),
            access_token: self.access_token.clone(),
            timeout: self.request_timeout(),
        }
    }

    pub fn gcs_config(&self) -> GcsConfig {
        GcsConfig {
            endpoint: self.storage_endpoint.clone(),
            project_id: self.project_id.clone(),
            bucket: self.bucket_name(),
            access_token: self.access_token.clone(),
            timeout: self.request_timeout(),
        }
    }
}

/// Which backends the adapters talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Google REST APIs.
    #[default]
    Gcp,
    /// In-process stores; nothing leaves the machine.
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcp" => Ok(Self::Gcp),
            "memory" => Ok(Self::Memory),
            other => Err(AgentError::ConfigError {
                reason: format!("unknown backend `{other}` (expected `gcp` or `memory`)"),
            }),
        }
    }
}

/// `[backend]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub kind: BackendKind,
}

/// `[history]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Entries retained before the oldest is evicted.  Must be non-zero.
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_entries: 500 }
    }
}

/// `[web]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

// ---------------------------------------------------------------------------
// HubConfig
// ---------------------------------------------------------------------------

/// Complete hub configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub gcp: GcpSettings,
    pub backend: BackendSettings,
    pub history: HistorySettings,
    pub web: WebSettings,
}

impl HubConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or [`DEFAULT_CONFIG_PATH`] when `None`.  A missing file
    /// yields defaults; an unreadable or invalid one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)?;
                info!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(AgentError::ConfigRead { path, source }),
        }
    }

    /// Load the file and apply overrides from the process environment.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.  Empty values are
    /// ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project) = get(env::PROJECT) {
            self.gcp.project_id = project;
        }
        if let Some(bucket) = get(env::BUCKET) {
            self.gcp.bucket_name = Some(bucket);
        }
        if let Some(kind) = get(env::BACKEND) {
            self.backend.kind = kind.parse()?;
        }
        if let Some(token) = get(env::ACCESS_TOKEN) {
            self.gcp.access_token = Some(token);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.history.max_entries == 0 {
            return Err(AgentError::ConfigError {
                reason: "history.max_entries must be greater than zero".into(),
            });
        }
        if self.gcp.project_id.trim().is_empty() {
            return Err(AgentError::ConfigError {
                reason: "gcp.project_id must not be empty".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
