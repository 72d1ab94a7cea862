//! Shared vocabulary: services, intents, confidence levels, document types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// A service family that a request may need.
///
/// Declaration order is significant: it is the order in which the catalog
/// is scanned and therefore the order of `required_services` and of the
/// planned actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// The analytic query service (data warehouse).
    Query,
    /// The object storage service.
    Storage,
    /// Workflow automation.  Recognised by the classifier, but no adapter
    /// backs it, so the planner never emits actions for it.
    Workflow,
}

impl ServiceKind {
    /// All services in catalog order.
    pub const ALL: [ServiceKind; 3] = [Self::Query, Self::Storage, Self::Workflow];

    /// The wire name of the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Storage => "storage",
            Self::Workflow => "workflow",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// The coarse category assigned to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryIntent {
    DataAnalysis,
    DocumentManagement,
    WorkflowAutomation,
    GeneralQuery,
}

impl PrimaryIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataAnalysis => "data_analysis",
            Self::DocumentManagement => "document_management",
            Self::WorkflowAutomation => "workflow_automation",
            Self::GeneralQuery => "general_query",
        }
    }
}

impl std::fmt::Display for PrimaryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sure the classifier is.  `High` iff at least one service matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
        }
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// The extraction pattern set a document is processed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Contracts,
    Reports,
    General,
}

impl DocType {
    /// Select the document type from a document name.
    ///
    /// `contract` wins over `report` when both substrings are present.
    pub fn for_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("contract") {
            Self::Contracts
        } else if lower.contains("report") {
            Self::Reports
        } else {
            Self::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contracts => "contracts",
            Self::Reports => "reports",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ServiceKind::Storage).unwrap();
        assert_eq!(json, "\"storage\"");
    }

    #[test]
    fn doc_type_selection_by_name() {
        assert_eq!(
            DocType::for_name("contracts/contract_001.txt"),
            DocType::Contracts
        );
        assert_eq!(
            DocType::for_name("reports/q4_2024_report.txt"),
            DocType::Reports
        );
        assert_eq!(
            DocType::for_name("policies/security_policy.txt"),
            DocType::General
        );
        assert_eq!(DocType::for_name("CONTRACT-report.txt"), DocType::Contracts);
    }

    #[test]
    fn primary_intent_display() {
        assert_eq!(PrimaryIntent::GeneralQuery.to_string(), "general_query");
        assert_eq!(Confidence::Medium.to_string(), "medium");
    }
}
