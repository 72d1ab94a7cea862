//! Core adapter trait and supporting types.
//!
//! Every service adapter implements [`ServiceAdapter`], giving the hub one
//! uniform way to discover operations and execute them by name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use intenthub_intent::ServiceKind;

use crate::error::Result;
use crate::result::ServiceResult;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The health status of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The adapter is connected and operational.
    Healthy,
    /// The adapter works but its setup step reported a problem.
    Degraded,
    /// The adapter has not been connected.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// An operation exposed by an adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDefinition {
    /// Machine-readable operation name (e.g. `list_objects`).
    pub name: String,
    /// Human-readable description of what the operation does.
    pub description: String,
    /// JSON Schema describing the operation's parameters.
    pub parameters: Value,
}

// ---------------------------------------------------------------------------
// Core trait
// ---------------------------------------------------------------------------

/// The universal service adapter interface.
///
/// `execute` never returns an error: transport faults, API errors and
/// unknown operation names all come back as [`ServiceResult::Failure`].
/// Each call reaches the managed service at most once per underlying
/// request, with no retry.
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    /// Return the unique identifier for this adapter instance.
    fn id(&self) -> &str;

    /// Return the service this adapter fronts.
    fn service(&self) -> ServiceKind;

    /// Prepare the backing service (e.g. create the bucket if missing).
    async fn connect(&mut self) -> Result<()>;

    /// Check whether the adapter is operational.
    async fn health_check(&self) -> HealthStatus;

    /// Return the list of operations this adapter exposes.
    fn operations(&self) -> Vec<OperationDefinition>;

    /// Execute a named operation with the given parameters.
    async fn execute(&self, operation: &str, params: &Map<String, Value>) -> ServiceResult;
}

// ---------------------------------------------------------------------------
// Parameter helpers
// ---------------------------------------------------------------------------

/// Read a string parameter, falling back to `default` when absent.
pub(crate) fn str_param<'a>(
    params: &'a Map<String, Value>,
    key: &str,
    default: &'a str,
) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or(default)
}
