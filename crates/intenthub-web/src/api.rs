//! REST API route handlers.
//!
//! Every handler delegates to the shared [`Hub`](intenthub_agent::Hub).
//! Adapter failures are part of the normal response body; the only client
//! error is a missing or blank query.

use std::sync::Arc;

use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use intenthub_agent::{
    AgentError, DemoReport, HubResponse, RagAnswer, SystemStatus, WorkflowHistoryEntry,
};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error body returned by every handler: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::EmptyInput => Self::bad_request(err.to_string()),
            other => {
                error!(error = %other, "request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: other.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /process`: `query=...` as a form or `{"query": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub query: String,
}

impl<S> FromRequest<S> for ProcessRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        let parsed = if is_json {
            Json::<ProcessRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.body_text())
        } else {
            Form::<ProcessRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.body_text())
        };

        // An unreadable body is treated like an absent query.
        Ok(parsed.unwrap_or_else(|reason| {
            warn!(%reason, "unreadable process body");
            ProcessRequest::default()
        }))
    }
}

/// Body of `POST /api/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default, alias = "query")]
    pub question: String,
}

/// Query string of `GET /api/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// POST /process
// ---------------------------------------------------------------------------

/// Run one free-text request through the hub.
pub async fn process(
    State(state): State<Arc<AppState>>,
    body: ProcessRequest,
) -> Result<Json<HubResponse>, ApiError> {
    let response = state.hub.handle(&body.query).await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

pub async fn status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    Json(state.hub.status().await)
}

// ---------------------------------------------------------------------------
// GET /api/demo
// ---------------------------------------------------------------------------

/// Process the three demo queries and return their results with the final
/// system status.
pub async fn demo(State(state): State<Arc<AppState>>) -> Result<Json<DemoReport>, ApiError> {
    Ok(Json(state.hub.run_demo().await?))
}

// ---------------------------------------------------------------------------
// POST /api/ask
// ---------------------------------------------------------------------------

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> Result<Json<RagAnswer>, ApiError> {
    Ok(Json(state.hub.ask(&body.question).await?))
}

// ---------------------------------------------------------------------------
// GET /api/history
// ---------------------------------------------------------------------------

/// Retained workflow history, oldest first.  `?limit=N` keeps the newest N.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<WorkflowHistoryEntry>> {
    Json(state.hub.history(params.limit).await)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_maps_to_bad_request() {
        let err = ApiError::from(AgentError::EmptyInput);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "No query provided");
    }

    #[test]
    fn other_errors_map_to_server_error() {
        let err = ApiError::from(AgentError::ConfigError {
            reason: "broken".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn ask_accepts_query_alias() {
        let body: AskRequest = serde_json::from_str(r#"{"query": "risk?"}"#).unwrap();
        assert_eq!(body.question, "risk?");
    }
}
