//! The pattern catalog: every keyword and regex the hub reasons with.
//!
//! The catalog is pure data compiled once at startup:
//!
//! | Table | Matcher | Used by |
//! |-------|---------|---------|
//! | Service triggers | [`regex::RegexSet`] per service | classifier |
//! | Intent keyword groups | [`aho_corasick`] substring automaton | classifier |
//! | Planner keywords | plain substring lists | planner |
//! | Field extraction | case-insensitive [`regex::Regex`] per field | knowledge extractor |
//! | Topic buckets | [`aho_corasick`] substring automaton | answer composer |
//!
//! All matching is against lowercased text except field extraction, which
//! runs case-insensitively over the original document text.

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder, RegexSet};

use crate::error::{IntentError, Result};
use crate::types::{DocType, PrimaryIntent, ServiceKind};

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

/// Trigger patterns for the query service.
pub const QUERY_PATTERNS: &[&str] = &[
    "query", "select", "analyze", "data", "table", "dataset", "claims", "fraud", "report",
    "analytics", "sample", "demo",
];

/// Trigger patterns for the storage service.
pub const STORAGE_PATTERNS: &[&str] = &[
    "file", "document", "upload", "download", "storage", "contract", "report", "pdf",
    "retrieve", "sample", "demo",
];

/// Trigger patterns for workflow automation.
pub const WORKFLOW_PATTERNS: &[&str] = &[
    "send", "email", "notify", "workflow", "automate", "pipeline", "process",
];

/// Intent keyword groups in priority order.  `GeneralQuery` is the fallback
/// and has no keywords.
pub const INTENT_KEYWORDS: &[(PrimaryIntent, &[&str])] = &[
    (
        PrimaryIntent::DataAnalysis,
        &["query", "select", "analyze", "report"],
    ),
    (
        PrimaryIntent::DocumentManagement,
        &["file", "document", "upload", "storage"],
    ),
    (
        PrimaryIntent::WorkflowAutomation,
        &["send", "email", "workflow"],
    ),
];

/// Keywords that turn any planned action into its sample-creation variant.
pub const SAMPLE_KEYWORDS: &[&str] = &["sample", "demo"];

/// Keywords that select the aggregate report on the query service.
pub const REPORT_KEYWORDS: &[&str] = &["analyze", "report"];

/// Field extraction patterns for contracts.
pub const CONTRACT_FIELDS: &[(&str, &str)] = &[
    ("amount", r"\$([0-9,]+)"),
    ("parties", r"Parties:\s*(.+)"),
    ("term", r"Term:\s*([0-9]+\s*(months|years))"),
    ("risk", r"Risk Level:\s*(\w+)"),
];

/// Field extraction patterns for financial reports.
pub const REPORT_FIELDS: &[(&str, &str)] = &[
    ("revenue", r"Revenue:\s*\$?([0-9,.]+[MK]?)"),
    ("profit", r"Profit:\s*\$?([0-9,.]+[MK]?)"),
    ("growth", r"growth.*?([0-9]+)%"),
];

/// Question topics in priority order.
pub const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Contracts, &["contract", "agreement"]),
    (Topic::FinancialReports, &["report", "revenue", "profit"]),
    (Topic::RiskCompliance, &["risk", "compliance"]),
];

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// A question bucket used by the answer composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Contracts,
    FinancialReports,
    RiskCompliance,
}

impl Topic {
    /// The one document each topic answers from.  Not derived from the
    /// question.
    pub fn document(&self) -> &'static str {
        match self {
            Self::Contracts => "contracts/contract_001.txt",
            Self::FinancialReports => "reports/q4_2024_report.txt",
            Self::RiskCompliance => "policies/security_policy.txt",
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled matchers
// ---------------------------------------------------------------------------

/// A labelled set of keywords compiled into one substring automaton.
pub struct KeywordGroup<L> {
    pub label: L,
    automaton: AhoCorasick,
}

impl<L: Copy + std::fmt::Debug> KeywordGroup<L> {
    /// Compile a keyword group.
    pub fn new(label: L, keywords: &[&str]) -> Result<Self> {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let automaton =
            AhoCorasick::new(&keywords).map_err(|e| IntentError::InvalidKeywords {
                group: format!("{label:?}"),
                reason: e.to_string(),
            })?;
        Ok(Self { label, automaton })
    }

    /// Whether any keyword occurs as a substring of `lowered`.
    pub fn matches(&self, lowered: &str) -> bool {
        self.automaton.is_match(lowered)
    }
}

/// Regex triggers for one service.
pub struct ServicePatterns {
    pub service: ServiceKind,
    set: RegexSet,
}

impl ServicePatterns {
    pub fn new(service: ServiceKind, patterns: &[&str]) -> Result<Self> {
        let set = RegexSet::new(patterns).map_err(|e| IntentError::InvalidPattern {
            pattern: patterns.join("|"),
            reason: e.to_string(),
        })?;
        Ok(Self { service, set })
    }

    /// Whether any trigger matches `lowered`.
    pub fn matches(&self, lowered: &str) -> bool {
        self.set.is_match(lowered)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// A named field and the regex that extracts it.
pub struct FieldPattern {
    pub field: String,
    compiled: Regex,
}

impl FieldPattern {
    /// Compile a field pattern.  Matching is case-insensitive.
    pub fn new(field: impl Into<String>, pattern: &str) -> Result<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| IntentError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            field: field.into(),
            compiled,
        })
    }

    /// Extract the canonical value of the first match.
    ///
    /// The canonical value is capture group 1 when the pattern has groups,
    /// otherwise the whole match.
    pub fn extract(&self, content: &str) -> Option<String> {
        let caps = self.compiled.captures(content)?;
        let value = if self.compiled.captures_len() > 1 {
            caps.get(1).or_else(|| caps.get(0))?
        } else {
            caps.get(0)?
        };
        Some(value.as_str().to_string())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The raw tables a catalog is compiled from.
#[derive(Debug, Clone, Copy)]
pub struct CatalogTables {
    pub services: &'static [(ServiceKind, &'static [&'static str])],
    pub intents: &'static [(PrimaryIntent, &'static [&'static str])],
    pub contract_fields: &'static [(&'static str, &'static str)],
    pub report_fields: &'static [(&'static str, &'static str)],
    pub topics: &'static [(Topic, &'static [&'static str])],
}

/// The built-in tables.
pub const BUILTIN_TABLES: CatalogTables = CatalogTables {
    services: &[
        (ServiceKind::Query, QUERY_PATTERNS),
        (ServiceKind::Storage, STORAGE_PATTERNS),
        (ServiceKind::Workflow, WORKFLOW_PATTERNS),
    ],
    intents: INTENT_KEYWORDS,
    contract_fields: CONTRACT_FIELDS,
    report_fields: REPORT_FIELDS,
    topics: TOPIC_KEYWORDS,
};

/// Compiled pattern catalog.
///
/// Not `Clone`: it holds compiled automata.  Share it behind an `Arc`.
pub struct PatternCatalog {
    services: Vec<ServicePatterns>,
    intents: Vec<KeywordGroup<PrimaryIntent>>,
    contract_fields: Vec<FieldPattern>,
    report_fields: Vec<FieldPattern>,
    topics: Vec<KeywordGroup<Topic>>,
}

impl PatternCatalog {
    /// Compile the built-in catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_tables(&BUILTIN_TABLES)
    }

    /// Compile a catalog from explicit tables.
    pub fn from_tables(tables: &CatalogTables) -> Result<Self> {
        let services = tables
            .services
            .iter()
            .map(|(kind, patterns)| ServicePatterns::new(*kind, patterns))
            .collect::<Result<Vec<_>>>()?;

        let intents = tables
            .intents
            .iter()
            .map(|(intent, keywords)| KeywordGroup::new(*intent, keywords))
            .collect::<Result<Vec<_>>>()?;

        let contract_fields = compile_fields(tables.contract_fields)?;
        let report_fields = compile_fields(tables.report_fields)?;

        let topics = tables
            .topics
            .iter()
            .map(|(topic, keywords)| KeywordGroup::new(*topic, keywords))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            services = services.len(),
            intent_groups = intents.len(),
            contract_fields = contract_fields.len(),
            report_fields = report_fields.len(),
            topics = topics.len(),
            "pattern catalog compiled"
        );

        Ok(Self {
            services,
            intents,
            contract_fields,
            report_fields,
            topics,
        })
    }

    /// Service triggers in catalog order.
    pub fn services(&self) -> &[ServicePatterns] {
        &self.services
    }

    /// Intent keyword groups in priority order.
    pub fn intent_groups(&self) -> &[KeywordGroup<PrimaryIntent>] {
        &self.intents
    }

    /// The extraction patterns for a document type.  `General` has none.
    pub fn fields_for(&self, doc_type: DocType) -> &[FieldPattern] {
        match doc_type {
            DocType::Contracts => &self.contract_fields,
            DocType::Reports => &self.report_fields,
            DocType::General => &[],
        }
    }

    /// The first topic bucket whose keywords occur in `lowered`.
    pub fn topic_for(&self, lowered: &str) -> Option<Topic> {
        self.topics
            .iter()
            .find(|group| group.matches(lowered))
            .map(|group| group.label)
    }
}

fn compile_fields(fields: &[(&str, &str)]) -> Result<Vec<FieldPattern>> {
    fields
        .iter()
        .map(|(field, pattern)| FieldPattern::new(*field, pattern))
        .collect()
}

/// Whether any of `keywords` occurs in `lowered`.
pub fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lowered.contains(k))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
