//! Request orchestration for IntentHub.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐     ┌─────────┐     ┌──────────┐
//! │ Classifier │────>│ Planner │────>│ Adapters │
//! └────────────┘     └─────────┘     └────┬─────┘
//!                                         │ sample documents
//!                  ┌──────────┐     ┌─────┴─────┐
//!                  │ Composer │<────│ Knowledge │
//!                  └────┬─────┘     └───────────┘
//!                       └──> response ──> history
//! ```
//!
//! ## Modules
//!
//! - [`orchestrator`] -- The [`Hub`]: handle, ask, demo, status, history.
//! - [`knowledge`] -- Field extraction and the knowledge base.
//! - [`composer`] -- Templated answers over the knowledge base.
//! - [`history`] -- Bounded workflow history.
//! - [`config`] -- TOML configuration with environment overrides.
//! - [`builder`] -- Wiring backends and adapters from configuration.
//! - [`error`] -- Agent error types.

pub mod builder;
pub mod composer;
pub mod config;
pub mod error;
pub mod history;
pub mod knowledge;
pub mod orchestrator;
pub mod response;

pub use builder::HubBuilder;
pub use composer::{AnswerComposer, RagAnswer};
pub use config::{BackendKind, HubConfig};
pub use error::{AgentError, Result};
pub use history::{WorkflowHistory, WorkflowHistoryEntry};
pub use knowledge::{ExtractedKnowledge, KnowledgeBase, KnowledgeSummary};
pub use orchestrator::{DEMO_QUERIES, Hub};
pub use response::{ActionRecord, DemoReport, HubResponse, SystemStatus};
