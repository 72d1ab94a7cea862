//! Shared application state for the web server.

use std::sync::Arc;

use intenthub_agent::Hub;

use crate::WebConfig;

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator.  It serialises access to its own knowledge base
    /// and history, so handlers never lock anything themselves.
    pub hub: Arc<Hub>,

    /// Web server configuration.
    pub config: WebConfig,
}

impl AppState {
    pub fn new(hub: Arc<Hub>, config: WebConfig) -> Self {
        Self { hub, config }
    }
}
