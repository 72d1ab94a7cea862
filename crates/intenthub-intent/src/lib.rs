//! Intent handling for IntentHub.
//!
//! This crate provides:
//!
//! - **Pattern catalog**: the static keyword and regex tables, compiled once,
//!   via [`catalog::PatternCatalog`].
//! - **Intent classification**: free text to [`IntentAnalysis`] via
//!   [`classifier::IntentClassifier`].
//! - **Action planning**: analysis to an ordered list of adapter calls via
//!   [`planner::ActionPlanner`].

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod planner;
pub mod types;

pub use catalog::{FieldPattern, PatternCatalog, Topic};
pub use classifier::{IntentAnalysis, IntentClassifier};
pub use error::{IntentError, Result};
pub use planner::{ActionPlanner, PlannedAction, actions};
pub use types::{Confidence, DocType, PrimaryIntent, ServiceKind};
