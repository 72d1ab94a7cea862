//! Action planner: turns an [`IntentAnalysis`] into adapter calls.
//!
//! Exactly one action per required service that has an adapter, in catalog
//! order.  For each service the decision tree is:
//!
//! ```text
//! "sample" | "demo"     -> sample-creation action
//! "analyze" | "report"  -> aggregate report (query service only)
//! otherwise             -> listing action ("list" / "show" land here too)
//! ```
//!
//! Parameters are always empty: the planner does not extract arguments from
//! the request text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::{REPORT_KEYWORDS, SAMPLE_KEYWORDS, contains_any};
use crate::classifier::IntentAnalysis;
use crate::types::ServiceKind;

/// Operation names understood by the service adapters.
pub mod actions {
    // Query service.
    pub const RUN_QUERY: &str = "run_query";
    pub const LIST_COLLECTIONS: &str = "list_collections";
    pub const CREATE_SAMPLE_DATASET: &str = "create_sample_dataset";
    pub const GET_AGGREGATE_REPORT: &str = "get_aggregate_report";

    // Storage service.
    pub const LIST_OBJECTS: &str = "list_objects";
    pub const PUT_OBJECT: &str = "put_object";
    pub const GET_OBJECT: &str = "get_object";
    pub const SEED_SAMPLE_OBJECTS: &str = "seed_sample_objects";
}

/// One planned adapter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub service: ServiceKind,
    pub action: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl PlannedAction {
    pub fn new(service: ServiceKind, action: impl Into<String>) -> Self {
        Self {
            service,
            action: action.into(),
            params: Map::new(),
        }
    }
}

/// Stateless keyword planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionPlanner;

impl ActionPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan the actions for `text` given its analysis.
    ///
    /// A pure function of the lowercased text and the required services.
    pub fn plan(&self, text: &str, analysis: &IntentAnalysis) -> Vec<PlannedAction> {
        let lowered = text.to_lowercase();
        let wants_sample = contains_any(&lowered, SAMPLE_KEYWORDS);

        let mut planned = Vec::with_capacity(analysis.required_services.len());

        for service in ServiceKind::ALL {
            if !analysis.requires(service) {
                continue;
            }

            let action = match service {
                ServiceKind::Query => {
                    if wants_sample {
                        actions::CREATE_SAMPLE_DATASET
                    } else if contains_any(&lowered, REPORT_KEYWORDS) {
                        actions::GET_AGGREGATE_REPORT
                    } else {
                        actions::LIST_COLLECTIONS
                    }
                }
                ServiceKind::Storage => {
                    if wants_sample {
                        actions::SEED_SAMPLE_OBJECTS
                    } else {
                        actions::LIST_OBJECTS
                    }
                }
                ServiceKind::Workflow => continue,
            };

            planned.push(PlannedAction::new(service, action));
        }

        debug!(
            actions = ?planned.iter().map(|a| a.action.as_str()).collect::<Vec<_>>(),
            "actions planned"
        );

        planned
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
