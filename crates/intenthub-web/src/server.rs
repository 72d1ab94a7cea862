//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and starts
//! the HTTP listener.

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::response::Html;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use intenthub_agent::Hub;

use crate::WebConfig;
use crate::api;
use crate::frontend::DASHBOARD_HTML;
use crate::state::AppState;

/// The IntentHub web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(config: WebConfig, hub: Arc<Hub>) -> Self {
        let state = Arc::new(AppState::new(hub, config.clone()));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);

        Router::new()
            // Embedded dashboard.
            .route("/", get(|| async { Html(DASHBOARD_HTML) }))
            .route("/process", post(api::process))
            .route("/status", get(api::status))
            // JSON API.
            .route("/api/demo", get(api::demo))
            .route("/api/ask", post(api::ask))
            .route("/api/history", get(api::history))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> io::Result<()> {
        let router = self.router();
        tracing::info!(addr = %listener.local_addr()?, "web server listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Bind the configured address and serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> io::Result<()> {
        let addr = self.addr();
        tracing::info!(addr = %addr, "starting web server");
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener, async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
        })
        .await
    }
}
