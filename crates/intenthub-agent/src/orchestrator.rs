//! The hub: classify, plan, execute, ingest, respond, record.
//!
//! ```text
//! text ──> IntentClassifier ──> ActionPlanner ──> adapters (one call each)
//!                                                     │
//!                     seed_sample_objects succeeded ──┴──> KnowledgeBase
//!                                                     │
//!            "analyze"/"report" ? AnswerComposer : summary ──> history
//! ```
//!
//! Adapter failures are data: they land in the response and the history
//! and processing continues.  The knowledge base and history share one lock,
//! so a [`Hub`] can be shared as `Arc<Hub>` across concurrent requests.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use intenthub_adapters::{HealthStatus, SAMPLE_DOCUMENTS, ServiceAdapter, ServiceResult};
use intenthub_intent::catalog::{REPORT_KEYWORDS, contains_any};
use intenthub_intent::{
    ActionPlanner, IntentAnalysis, IntentClassifier, PatternCatalog, PlannedAction, ServiceKind,
    actions,
};

use crate::composer::{AnswerComposer, RagAnswer};
use crate::error::{AgentError, Result};
use crate::history::{WorkflowHistory, WorkflowHistoryEntry};
use crate::knowledge::{KnowledgeBase, KnowledgeSummary};
use crate::response::{
    ActionRecord, ComponentStatus, DemoReport, DemoResult, HubResponse, NEXT_STEPS, SystemStatus,
};

/// The queries a demo run processes, in order.
pub const DEMO_QUERIES: [&str; 3] = [
    "Create sample data for demonstration",
    "Show me what documents are available",
    "Analyze claims data and generate report",
];

/// Mutable state shared by all requests.
pub struct HubState {
    pub knowledge: KnowledgeBase,
    pub history: WorkflowHistory,
}

/// Request orchestrator.
pub struct Hub {
    classifier: IntentClassifier,
    planner: ActionPlanner,
    composer: AnswerComposer,
    adapters: Vec<Box<dyn ServiceAdapter>>,
    state: Mutex<HubState>,
}

impl Hub {
    /// Assemble a hub from already-connected adapters.
    pub fn new(
        catalog: Arc<PatternCatalog>,
        adapters: Vec<Box<dyn ServiceAdapter>>,
        max_history: usize,
    ) -> Self {
        info!(adapters = adapters.len(), max_history, "hub initialised");
        Self {
            classifier: IntentClassifier::new(catalog.clone()),
            planner: ActionPlanner::new(),
            composer: AnswerComposer::new(catalog.clone()),
            adapters,
            state: Mutex::new(HubState {
                knowledge: KnowledgeBase::new(catalog),
                history: WorkflowHistory::new(max_history),
            }),
        }
    }

    /// Connect every adapter, then assemble the hub.
    pub async fn connect(
        catalog: Arc<PatternCatalog>,
        mut adapters: Vec<Box<dyn ServiceAdapter>>,
        max_history: usize,
    ) -> Result<Self> {
        for adapter in &mut adapters {
            adapter.connect().await?;
        }
        Ok(Self::new(catalog, adapters, max_history))
    }

    fn adapter_for(&self, service: ServiceKind) -> Option<&dyn ServiceAdapter> {
        self.adapters
            .iter()
            .find(|a| a.service() == service)
            .map(|a| &**a)
    }

    // -- Requests -------------------------------------------------------------

    /// Process one free-text request end to end.
    ///
    /// Only empty input is an error.
    pub async fn handle(&self, text: &str) -> Result<HubResponse> {
        if text.trim().is_empty() {
            return Err(AgentError::EmptyInput);
        }
        info!(input = text, "processing request");

        let intent = self.classifier.classify(text);
        let planned = self.planner.plan(text, &intent);
        debug!(actions = planned.len(), "actions planned");

        let mut results = Vec::with_capacity(planned.len());
        for action in &planned {
            let result = self.execute(action).await;
            if action.action == actions::SEED_SAMPLE_OBJECTS && result.is_success() {
                self.ingest_sample_documents().await;
            }
            results.push(ActionRecord {
                service: action.service,
                action: action.action.clone(),
                result,
            });
        }

        let mut state = self.state.lock().await;
        let response = self.respond(text, intent.clone(), results.clone(), &state.knowledge);
        state.history.push(WorkflowHistoryEntry::new(
            text,
            intent,
            planned,
            results,
            response.clone(),
        ));
        info!(
            kind = response.kind(),
            processed = state.history.total_processed(),
            "request complete"
        );
        Ok(response)
    }

    /// Answer a question from the knowledge base without running a workflow.
    pub async fn ask(&self, question: &str) -> Result<RagAnswer> {
        if question.trim().is_empty() {
            return Err(AgentError::EmptyInput);
        }
        let state = self.state.lock().await;
        Ok(self.composer.answer(question, &state.knowledge))
    }

    /// Run the three demo queries in order.
    pub async fn run_demo(&self) -> Result<DemoReport> {
        let mut results = Vec::with_capacity(DEMO_QUERIES.len());
        for query in DEMO_QUERIES {
            info!(query, "running demo query");
            let result = self.handle(query).await?;
            results.push(DemoResult {
                query: query.to_string(),
                result,
            });
        }
        Ok(DemoReport {
            demo: "complete".into(),
            results,
            system_status: self.status().await,
        })
    }

    // -- Introspection --------------------------------------------------------

    pub async fn status(&self) -> SystemStatus {
        let query_adapter = self.health_of(ServiceKind::Query).await;
        let storage_adapter = self.health_of(ServiceKind::Storage).await;
        let state = self.state.lock().await;
        SystemStatus {
            status: "operational".into(),
            components: ComponentStatus {
                query_adapter,
                storage_adapter,
                router: HealthStatus::Healthy,
                knowledge: HealthStatus::Healthy,
            },
            workflows_processed: state.history.total_processed(),
            history_retained: state.history.len(),
            rag_knowledge: state.knowledge.summary(),
        }
    }

    /// The newest `limit` history entries (all when `None`), oldest first.
    pub async fn history(&self, limit: Option<usize>) -> Vec<WorkflowHistoryEntry> {
        let state = self.state.lock().await;
        state.history.recent(limit.unwrap_or(usize::MAX))
    }

    pub async fn knowledge_summary(&self) -> KnowledgeSummary {
        self.state.lock().await.knowledge.summary()
    }

    /// Names of the documents in the knowledge base, in insertion order.
    pub async fn knowledge_documents(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.knowledge.document_names().map(str::to_string).collect()
    }

    // -- Steps ----------------------------------------------------------------

    async fn health_of(&self, service: ServiceKind) -> HealthStatus {
        match self.adapter_for(service) {
            Some(adapter) => adapter.health_check().await,
            None => HealthStatus::Unhealthy,
        }
    }

    async fn execute(&self, action: &PlannedAction) -> ServiceResult {
        let Some(adapter) = self.adapter_for(action.service) else {
            warn!(service = %action.service, action = %action.action, "no adapter for service");
            return ServiceResult::failure(format!("No adapter for service {}", action.service));
        };
        debug!(service = %action.service, action = %action.action, "executing");
        let result = adapter.execute(&action.action, &action.params).await;
        match result.error() {
            Some(error) => {
                warn!(service = %action.service, action = %action.action, error, "action failed")
            }
            None => info!(service = %action.service, action = %action.action, "action succeeded"),
        }
        result
    }

    /// Feed the fixed sample documents to the knowledge base.  These are the
    /// built-in texts, not a read-back of what the store accepted.
    async fn ingest_sample_documents(&self) {
        let mut state = self.state.lock().await;
        for (name, content) in SAMPLE_DOCUMENTS {
            state.knowledge.ingest(name, content);
        }
        info!(documents = SAMPLE_DOCUMENTS.len(), "sample documents ingested");
    }

    fn respond(
        &self,
        text: &str,
        intent: IntentAnalysis,
        service_results: Vec<ActionRecord>,
        knowledge: &KnowledgeBase,
    ) -> HubResponse {
        if contains_any(&text.to_lowercase(), REPORT_KEYWORDS) {
            HubResponse::Analysis {
                input: text.to_string(),
                intent,
                rag_response: self.composer.answer(text, knowledge),
                summary: format!("Analysis complete. Processed {} services.", service_results.len()),
                service_results,
            }
        } else {
            HubResponse::General {
                input: text.to_string(),
                intent,
                summary: format!(
                    "Request processed successfully. Executed {} actions.",
                    service_results.len()
                ),
                service_results,
                next_steps: NEXT_STEPS.into(),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use intenthub_adapters::{
        MemoryObjectStore, MemoryWarehouse, QueryAdapter, QueryAdapterConfig, StorageAdapter,
    };

    use super::*;

    async fn hub(max_history: usize) -> Hub {
        let adapters: Vec<Box<dyn ServiceAdapter>> = vec![
            Box::new(QueryAdapter::new(
                "query",
                QueryAdapterConfig::default(),
                Arc::new(MemoryWarehouse::new()),
            )),
            Box::new(StorageAdapter::new(
                "storage",
                Arc::new(MemoryObjectStore::new("bucket")),
            )),
        ];
        Hub::connect(Arc::new(PatternCatalog::builtin().unwrap()), adapters, max_history)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let hub = hub(10).await;
        assert!(matches!(hub.handle("   ").await, Err(AgentError::EmptyInput)));
        assert!(matches!(hub.ask("").await, Err(AgentError::EmptyInput)));
        assert_eq!(hub.status().await.workflows_processed, 0);
    }

    #[tokio::test]
    async fn unmatched_text_is_general_with_no_actions() {
        let hub = hub(10).await;
        let response = hub.handle("Hello there").await.unwrap();
        assert_eq!(response.kind(), "general");
        assert!(response.service_results().is_empty());
        assert_eq!(
            response.summary(),
            "Request processed successfully. Executed 0 actions."
        );
    }

    #[tokio::test]
    async fn workflow_only_requests_plan_nothing() {
        let hub = hub(10).await;
        let response = hub.handle("send an email").await.unwrap();
        assert_eq!(response.intent().required_services, [ServiceKind::Workflow]);
        assert!(response.service_results().is_empty());
    }

    #[tokio::test]
    async fn missing_adapter_becomes_failure_record() {
        let hub = Hub::new(Arc::new(PatternCatalog::builtin().unwrap()), Vec::new(), 10);
        let response = hub.handle("Show me my datasets in BigQuery").await.unwrap();
        let record = &response.service_results()[0];
        assert_eq!(record.result.error(), Some("No adapter for service query"));
        assert_eq!(
            hub.status().await.components.query_adapter,
            HealthStatus::Unhealthy
        );
    }

    #[tokio::test]
    async fn response_serialises_with_type_tag() {
        let hub = hub(10).await;
        let response = hub.handle("Hello there").await.unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "general");
        assert_eq!(value["input"], "Hello there");
        assert_eq!(value["intent"]["primary_intent"], "general_query");
        assert_eq!(value["intent"]["confidence"], "medium");
        assert_eq!(value["next_steps"], NEXT_STEPS);
    }
}
