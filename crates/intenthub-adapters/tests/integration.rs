//! Integration tests for the intenthub-adapters crate.
//!
//! These exercise both adapters through the [`ServiceAdapter`] trait object,
//! the way the hub drives them.

use std::sync::Arc;

use intenthub_adapters::{
    HealthStatus, MemoryObjectStore, MemoryWarehouse, QueryAdapter, QueryAdapterConfig,
    SAMPLE_DOCUMENTS, ServiceAdapter, ServiceResult, StorageAdapter,
};
use intenthub_intent::ServiceKind;
use serde_json::{Map, json};

async fn adapters() -> Vec<Box<dyn ServiceAdapter>> {
    let mut query: Box<dyn ServiceAdapter> = Box::new(QueryAdapter::new(
        "query",
        QueryAdapterConfig::default(),
        Arc::new(MemoryWarehouse::new()),
    ));
    let mut storage: Box<dyn ServiceAdapter> = Box::new(StorageAdapter::new(
        "storage",
        Arc::new(MemoryObjectStore::new("your-project-id-rag-documents")),
    ));
    query.connect().await.unwrap();
    storage.connect().await.unwrap();
    vec![query, storage]
}

#[tokio::test]
async fn unknown_operation_fails_without_raising() {
    for adapter in adapters().await {
        let result = adapter.execute("drop_everything", &Map::new()).await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": false, "error": "Unknown method: drop_everything" })
        );
    }
}

#[tokio::test]
async fn adapters_report_their_service_and_health() {
    let adapters = adapters().await;
    assert_eq!(adapters[0].service(), ServiceKind::Query);
    assert_eq!(adapters[1].service(), ServiceKind::Storage);
    for adapter in &adapters {
        assert_eq!(adapter.health_check().await, HealthStatus::Healthy);
        assert_eq!(adapter.operations().len(), 4);
    }
}

#[tokio::test]
async fn sample_creation_on_both_services() {
    let adapters = adapters().await;

    let dataset = adapters[0].execute("create_sample_dataset", &Map::new()).await;
    assert_eq!(
        dataset,
        ServiceResult::success(json!({ "message": "Sample table created successfully" }))
    );

    let seeded = adapters[1].execute("seed_sample_objects", &Map::new()).await;
    let files: Vec<&str> = seeded
        .get("uploaded_files")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["file"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = SAMPLE_DOCUMENTS.iter().map(|(name, _)| *name).collect();
    assert_eq!(files, expected);

    let mut params = Map::new();
    params.insert("name".into(), json!("contracts/contract_001.txt"));
    let contract = adapters[1].execute("get_object", &params).await;
    assert_eq!(contract.get("content"), Some(&json!(SAMPLE_DOCUMENTS[0].1)));
}
