//! Integration tests for classification and planning as one routing step.

use std::sync::Arc;

use intenthub_intent::{
    ActionPlanner, Confidence, IntentClassifier, PatternCatalog, PrimaryIntent, ServiceKind,
    actions,
};

fn classifier() -> IntentClassifier {
    IntentClassifier::new(Arc::new(
        PatternCatalog::builtin().expect("builtin catalog"),
    ))
}

#[test]
fn query_keywords_always_require_the_query_service() {
    let classifier = classifier();
    for text in [
        "run a query",
        "please analyze this",
        "quarterly report",
        "QUERY everything",
        "can you Analyze it?",
    ] {
        let analysis = classifier.classify(text);
        assert!(
            analysis.requires(ServiceKind::Query),
            "`{text}` must require the query service"
        );
    }
}

#[test]
fn texts_without_keywords_are_general_queries() {
    let classifier = classifier();
    for text in ["", "hello", "what time is it", "good night moon"] {
        let analysis = classifier.classify(text);
        assert_eq!(analysis.primary_intent, PrimaryIntent::GeneralQuery, "{text}");
        assert!(analysis.required_services.is_empty(), "{text}");
        assert_eq!(analysis.confidence, Confidence::Medium, "{text}");
    }
}

#[test]
fn routing_the_documented_example_queries() {
    let classifier = classifier();
    let planner = ActionPlanner::new();

    let text = "Upload a contract document to storage";
    let analysis = classifier.classify(text);
    let planned = planner.plan(text, &analysis);
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].service, ServiceKind::Storage);
    assert_eq!(planned[0].action, actions::LIST_OBJECTS);

    let text = "Show me what documents are available";
    let analysis = classifier.classify(text);
    assert_eq!(analysis.primary_intent, PrimaryIntent::DocumentManagement);
    let planned = planner.plan(text, &analysis);
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].action, actions::LIST_OBJECTS);
}

#[test]
fn planned_actions_serialize_with_empty_params() {
    let classifier = classifier();
    let text = "Create sample data for demonstration";
    let planned = ActionPlanner::new().plan(text, &classifier.classify(text));
    let json = serde_json::to_value(&planned).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"service": "query", "action": "create_sample_dataset", "params": {}},
            {"service": "storage", "action": "seed_sample_objects", "params": {}},
        ])
    );
}
