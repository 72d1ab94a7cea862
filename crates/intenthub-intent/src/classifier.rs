//! Intent classifier: free text in, [`IntentAnalysis`] out.
//!
//! Two independent passes over the lowercased text:
//!
//! 1. **Services**: every service whose trigger set matches is added to
//!    `required_services`, in catalog order.
//! 2. **Primary intent**: the first keyword group (in priority order) with a
//!    hit wins; otherwise [`PrimaryIntent::GeneralQuery`].
//!
//! Classification never fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::PatternCatalog;
use crate::types::{Confidence, PrimaryIntent, ServiceKind};

/// The result of classifying one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub primary_intent: PrimaryIntent,
    /// Matched services in catalog order, without duplicates.
    pub required_services: Vec<ServiceKind>,
    /// Human-readable explanation of the routing decision.
    pub reasoning: String,
    pub confidence: Confidence,
}

impl IntentAnalysis {
    /// Whether the analysis requires `service`.
    pub fn requires(&self, service: ServiceKind) -> bool {
        self.required_services.contains(&service)
    }
}

/// Keyword-driven intent classifier.
#[derive(Clone)]
pub struct IntentClassifier {
    catalog: Arc<PatternCatalog>,
}

impl IntentClassifier {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Classify raw user text.
    pub fn classify(&self, text: &str) -> IntentAnalysis {
        let lowered = text.to_lowercase();

        let required_services: Vec<ServiceKind> = self
            .catalog
            .services()
            .iter()
            .filter(|patterns| patterns.matches(&lowered))
            .map(|patterns| patterns.service)
            .collect();

        let primary_intent = self
            .catalog
            .intent_groups()
            .iter()
            .find(|group| group.matches(&lowered))
            .map(|group| group.label)
            .unwrap_or(PrimaryIntent::GeneralQuery);

        let confidence = if required_services.is_empty() {
            Confidence::Medium
        } else {
            Confidence::High
        };

        let reasoning = reasoning_for(primary_intent, &required_services);

        debug!(
            intent = %primary_intent,
            services = ?required_services,
            %confidence,
            "request classified"
        );

        IntentAnalysis {
            primary_intent,
            required_services,
            reasoning,
            confidence,
        }
    }
}

/// Fill the per-intent reasoning template.
fn reasoning_for(intent: PrimaryIntent, services: &[ServiceKind]) -> String {
    let names = if services.is_empty() {
        "general processing".to_string()
    } else {
        services
            .iter()
            .map(ServiceKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    match intent {
        PrimaryIntent::DataAnalysis => format!("User wants to analyze data using {names}"),
        PrimaryIntent::DocumentManagement => {
            format!("User wants to manage documents using {names}")
        }
        PrimaryIntent::WorkflowAutomation => {
            format!("User wants to automate workflows using {names}")
        }
        PrimaryIntent::GeneralQuery => {
            format!("User has a general query that may require {names}")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(Arc::new(PatternCatalog::builtin().unwrap()))
    }

    #[test]
    fn sample_request_needs_query_and_storage() {
        let analysis = classifier().classify("Create sample data for demonstration");
        assert_eq!(
            analysis.required_services,
            vec![ServiceKind::Query, ServiceKind::Storage]
        );
        assert_eq!(analysis.primary_intent, PrimaryIntent::GeneralQuery);
        assert_eq!(analysis.confidence, Confidence::High);
        assert_eq!(
            analysis.reasoning,
            "User has a general query that may require query, storage"
        );
    }

    #[test]
    fn unmatched_text_is_general_with_medium_confidence() {
        let analysis = classifier().classify("hello, how are you?");
        assert_eq!(analysis.primary_intent, PrimaryIntent::GeneralQuery);
        assert!(analysis.required_services.is_empty());
        assert_eq!(analysis.confidence, Confidence::Medium);
        assert_eq!(
            analysis.reasoning,
            "User has a general query that may require general processing"
        );
    }

    #[test]
    fn data_analysis_beats_document_management() {
        let analysis = classifier().classify("Upload the report file");
        assert_eq!(analysis.primary_intent, PrimaryIntent::DataAnalysis);
    }

    #[test]
    fn document_management_intent() {
        let analysis = classifier().classify("Upload a contract document to storage");
        assert_eq!(analysis.primary_intent, PrimaryIntent::DocumentManagement);
        assert_eq!(analysis.required_services, vec![ServiceKind::Storage]);
        assert_eq!(
            analysis.reasoning,
            "User wants to manage documents using storage"
        );
    }

    #[test]
    fn workflow_intent_and_service() {
        let analysis = classifier().classify("Send an email to the team");
        assert_eq!(analysis.primary_intent, PrimaryIntent::WorkflowAutomation);
        assert_eq!(analysis.required_services, vec![ServiceKind::Workflow]);
    }

    #[test]
    fn classification_is_case_insensitive() {
        let analysis = classifier().classify("ANALYZE CLAIMS");
        assert_eq!(analysis.primary_intent, PrimaryIntent::DataAnalysis);
        assert!(analysis.requires(ServiceKind::Query));
    }

    #[test]
    fn analysis_serializes_with_snake_case_labels() {
        let analysis = classifier().classify("Show me my datasets in BigQuery");
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["primary_intent"], "data_analysis");
        assert_eq!(json["required_services"], serde_json::json!(["query"]));
        assert_eq!(json["confidence"], "high");
    }
}
