//! Knowledge extraction and the in-memory knowledge base.
//!
//! A document's type is chosen from its name ([`DocType::for_name`]); each
//! field pattern of that type is run once over the content and the first
//! match is stored as a single canonical string.  `General` documents are
//! stored with no entities.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use intenthub_intent::{DocType, PatternCatalog};

/// What was extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedKnowledge {
    #[serde(rename = "type")]
    pub doc_type: DocType,
    /// Field name to first-match value.  Fields without a match are absent.
    pub entities: IndexMap<String, String>,
}

impl ExtractedKnowledge {
    pub fn entity(&self, field: &str) -> Option<&str> {
        self.entities.get(field).map(String::as_str)
    }
}

/// Aggregate view of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    pub total_documents: usize,
    pub document_types: IndexMap<DocType, usize>,
    /// `"field: value"` for every entity of every document, in insertion
    /// order.
    pub key_entities: Vec<String>,
}

/// Document name to extracted knowledge.
///
/// Keeps insertion order.  Re-ingesting a name replaces its entities but
/// keeps its original position.  Nothing is ever removed.
pub struct KnowledgeBase {
    catalog: Arc<PatternCatalog>,
    documents: IndexMap<String, ExtractedKnowledge>,
}

impl KnowledgeBase {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self {
            catalog,
            documents: IndexMap::new(),
        }
    }

    /// Extract without storing.
    pub fn extract(&self, name: &str, content: &str) -> ExtractedKnowledge {
        let doc_type = DocType::for_name(name);
        let entities = self
            .catalog
            .fields_for(doc_type)
            .iter()
            .filter_map(|pattern| {
                pattern
                    .extract(content)
                    .map(|value| (pattern.field.clone(), value))
            })
            .collect();
        ExtractedKnowledge { doc_type, entities }
    }

    /// Extract and store, overwriting any earlier entry for `name`.
    pub fn ingest(&mut self, name: &str, content: &str) -> &ExtractedKnowledge {
        let knowledge = self.extract(name, content);
        debug!(
            document = name,
            doc_type = %knowledge.doc_type,
            entities = knowledge.entities.len(),
            "knowledge extracted"
        );
        let (index, _) = self.documents.insert_full(name.to_string(), knowledge);
        &self.documents[index]
    }

    pub fn knowledge_for(&self, name: &str) -> Option<&ExtractedKnowledge> {
        self.documents.get(name)
    }

    /// Document names in insertion order.
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn summary(&self) -> KnowledgeSummary {
        let mut document_types = IndexMap::new();
        let mut key_entities = Vec::new();
        for knowledge in self.documents.values() {
            *document_types.entry(knowledge.doc_type).or_insert(0) += 1;
            key_entities.extend(
                knowledge
                    .entities
                    .iter()
                    .map(|(field, value)| format!("{field}: {value}")),
            );
        }
        KnowledgeSummary {
            total_documents: self.documents.len(),
            document_types,
            key_entities,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use intenthub_adapters::SAMPLE_DOCUMENTS;

    use super::*;

    fn knowledge_base() -> KnowledgeBase {
        KnowledgeBase::new(Arc::new(PatternCatalog::builtin().unwrap()))
    }

    #[test]
    fn contract_fields() {
        let kb = knowledge_base();
        let (name, content) = SAMPLE_DOCUMENTS[0];
        let k = kb.extract(name, content);
        assert_eq!(k.doc_type, DocType::Contracts);
        assert_eq!(k.entity("amount"), Some("50,000"));
        assert_eq!(k.entity("parties"), Some("Company A & Vendor B"));
        assert_eq!(k.entity("term"), Some("12 months"));
        assert_eq!(k.entity("risk"), Some("Medium"));
    }

    #[test]
    fn report_fields_skip_unmatched_growth() {
        let kb = knowledge_base();
        let (name, content) = SAMPLE_DOCUMENTS[1];
        let k = kb.extract(name, content);
        assert_eq!(k.doc_type, DocType::Reports);
        assert_eq!(k.entity("revenue"), Some("1.2M"));
        assert_eq!(k.entity("profit"), Some("400K"));
        // "15% growth" puts the number before the keyword.
        assert_eq!(k.entity("growth"), None);
        assert!(!k.entities.contains_key("growth"));
    }

    #[test]
    fn report_growth_when_number_follows() {
        let kb = knowledge_base();
        let k = kb.extract("annual_report.txt", "Revenue growth reached 22%");
        assert_eq!(k.entity("growth"), Some("22"));
    }

    #[test]
    fn general_documents_have_no_entities() {
        let kb = knowledge_base();
        let (name, content) = SAMPLE_DOCUMENTS[2];
        let k = kb.extract(name, content);
        assert_eq!(k.doc_type, DocType::General);
        assert!(k.entities.is_empty());
    }

    #[test]
    fn extraction_is_case_insensitive() {
        let kb = knowledge_base();
        let k = kb.extract("CONTRACT.TXT", "risk level: high");
        assert_eq!(k.entity("risk"), Some("high"));
    }

    #[test]
    fn reingest_overwrites_in_place() {
        let mut kb = knowledge_base();
        kb.ingest("contracts/a.txt", "Risk Level: Low\nValue: $10");
        kb.ingest("reports/b.txt", "Profit: $1K");
        kb.ingest("contracts/a.txt", "Risk Level: High");

        let names: Vec<&str> = kb.document_names().collect();
        assert_eq!(names, ["contracts/a.txt", "reports/b.txt"]);
        let a = kb.knowledge_for("contracts/a.txt").unwrap();
        assert_eq!(a.entity("risk"), Some("High"));
        assert_eq!(a.entity("amount"), None);
    }

    #[test]
    fn summary_counts_types_and_entities() {
        let mut kb = knowledge_base();
        for (name, content) in SAMPLE_DOCUMENTS {
            kb.ingest(name, content);
        }
        let summary = kb.summary();
        assert_eq!(summary.total_documents, 3);
        assert_eq!(summary.document_types[&DocType::Contracts], 1);
        assert_eq!(summary.document_types[&DocType::General], 1);
        assert_eq!(summary.key_entities[0], "amount: 50,000");
        assert_eq!(summary.key_entities.len(), 6);
    }

    #[test]
    fn knowledge_serialises_with_type_key() {
        let mut kb = knowledge_base();
        let k = kb.ingest("contracts/x.txt", "Risk Level: Low").clone();
        assert_eq!(
            serde_json::to_value(&k).unwrap(),
            serde_json::json!({ "type": "contracts", "entities": { "risk": "Low" } })
        );
    }
}
