//! Web interface for IntentHub.
//!
//! A thin axum shell over a shared [`Hub`](intenthub_agent::Hub):
//!
//! - `GET /` serves the embedded dashboard.
//! - `POST /process` runs one request (form or JSON `query` field).
//! - `GET /status`, `GET /api/demo`, `POST /api/ask`, `GET /api/history`
//!   expose status, the demo run, direct questions and the workflow log.

pub mod api;
pub mod frontend;
pub mod server;
pub mod state;

pub use server::WebServer;
pub use state::AppState;

use intenthub_agent::config::WebSettings;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from(&WebSettings::default())
    }
}

impl From<&WebSettings> for WebConfig {
    fn from(settings: &WebSettings) -> Self {
        Self {
            bind_addr: settings.bind.clone(),
            port: settings.port,
        }
    }
}
