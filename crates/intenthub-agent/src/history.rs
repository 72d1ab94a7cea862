//! Bounded workflow history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use intenthub_intent::{IntentAnalysis, PlannedAction};

use crate::response::{ActionRecord, HubResponse};

/// Everything recorded about one handled request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowHistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub input: String,
    pub intent: IntentAnalysis,
    pub actions: Vec<PlannedAction>,
    pub results: Vec<ActionRecord>,
    pub response: HubResponse,
}

impl WorkflowHistoryEntry {
    pub fn new(
        input: impl Into<String>,
        intent: IntentAnalysis,
        actions: Vec<PlannedAction>,
        results: Vec<ActionRecord>,
        response: HubResponse,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            input: input.into(),
            intent,
            actions,
            results,
            response,
        }
    }
}

/// Ring of the most recent entries; the oldest is evicted first.
#[derive(Debug)]
pub struct WorkflowHistory {
    entries: VecDeque<WorkflowHistoryEntry>,
    max_entries: usize,
    total: u64,
}

impl WorkflowHistory {
    /// `max_entries` is clamped to at least one.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(64)),
            max_entries,
            total: 0,
        }
    }

    pub fn push(&mut self, entry: WorkflowHistoryEntry) {
        while self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(id = %evicted.id, "history entry evicted");
            }
        }
        self.entries.push_back(entry);
        self.total += 1;
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &WorkflowHistoryEntry> {
        self.entries.iter()
    }

    /// The newest `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<WorkflowHistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ever pushed, including evicted ones.
    pub fn total_processed(&self) -> u64 {
        self.total
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use intenthub_intent::{Confidence, PrimaryIntent};

    use super::*;
    use crate::response::NEXT_STEPS;

    fn entry(input: &str) -> WorkflowHistoryEntry {
        let intent = IntentAnalysis {
            primary_intent: PrimaryIntent::GeneralQuery,
            required_services: Vec::new(),
            reasoning: "User has a general query that may require general processing".into(),
            confidence: Confidence::Medium,
        };
        let response = HubResponse::General {
            input: input.into(),
            intent: intent.clone(),
            service_results: Vec::new(),
            summary: "Request processed successfully. Executed 0 actions.".into(),
            next_steps: NEXT_STEPS.into(),
        };
        WorkflowHistoryEntry::new(input, intent, Vec::new(), Vec::new(), response)
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut history = WorkflowHistory::new(2);
        for input in ["a", "b", "c"] {
            history.push(entry(input));
        }
        let inputs: Vec<&str> = history.entries().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, ["b", "c"]);
        assert_eq!(history.total_processed(), 3);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn recent_returns_newest_in_order() {
        let mut history = WorkflowHistory::new(10);
        for input in ["a", "b", "c"] {
            history.push(entry(input));
        }
        let recent: Vec<String> = history.recent(2).into_iter().map(|e| e.input).collect();
        assert_eq!(recent, ["b", "c"]);
        assert_eq!(history.recent(50).len(), 3);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = WorkflowHistory::new(0);
        history.push(entry("a"));
        history.push(entry("b"));
        assert_eq!(history.max_entries(), 1);
        assert_eq!(history.entries().next().unwrap().input, "b");
    }
}
