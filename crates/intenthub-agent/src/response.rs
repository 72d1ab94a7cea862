//! Shapes returned by the hub.

use serde::{Deserialize, Serialize};

use intenthub_adapters::{HealthStatus, ServiceResult};
use intenthub_intent::{IntentAnalysis, ServiceKind};

use crate::composer::RagAnswer;
use crate::knowledge::KnowledgeSummary;

/// Suggested follow-ups on every general response.
pub const NEXT_STEPS: &str = "You can ask me to analyze data, manage documents, or create reports.";

/// The outcome of one executed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub service: ServiceKind,
    pub action: String,
    pub result: ServiceResult,
}

/// The hub's answer to one request, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubResponse {
    /// The request asked to analyze or report.
    Analysis {
        input: String,
        intent: IntentAnalysis,
        rag_response: RagAnswer,
        service_results: Vec<ActionRecord>,
        summary: String,
    },
    General {
        input: String,
        intent: IntentAnalysis,
        service_results: Vec<ActionRecord>,
        summary: String,
        next_steps: String,
    },
}

impl HubResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Analysis { .. } => "analysis",
            Self::General { .. } => "general",
        }
    }

    pub fn intent(&self) -> &IntentAnalysis {
        match self {
            Self::Analysis { intent, .. } | Self::General { intent, .. } => intent,
        }
    }

    pub fn service_results(&self) -> &[ActionRecord] {
        match self {
            Self::Analysis {
                service_results, ..
            }
            | Self::General {
                service_results, ..
            } => service_results,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            Self::Analysis { summary, .. } | Self::General { summary, .. } => summary,
        }
    }

    pub fn rag_response(&self) -> Option<&RagAnswer> {
        match self {
            Self::Analysis { rag_response, .. } => Some(rag_response),
            Self::General { .. } => None,
        }
    }
}

/// Health of each hub component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub query_adapter: HealthStatus,
    pub storage_adapter: HealthStatus,
    pub router: HealthStatus,
    pub knowledge: HealthStatus,
}

/// Operational snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    pub components: ComponentStatus,
    /// Every request handled since start, including evicted history.
    pub workflows_processed: u64,
    pub history_retained: usize,
    pub rag_knowledge: KnowledgeSummary,
}

/// One query of a demo run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoResult {
    pub query: String,
    pub result: HubResponse,
}

/// The full demo run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub demo: String,
    pub results: Vec<DemoResult>,
    pub system_status: SystemStatus,
}
