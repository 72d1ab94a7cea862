//! Object storage adapter.
//!
//! Operations: `list_objects`, `put_object`, `get_object` and
//! `seed_sample_objects`.  `connect` makes sure the bucket exists.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use intenthub_intent::{ServiceKind, actions};

use super::{ObjectStore, SAMPLE_DOCUMENTS};
use crate::error::{AdapterError, Result};
use crate::result::ServiceResult;
use crate::traits::{HealthStatus, OperationDefinition, ServiceAdapter, str_param};

/// Location used when the adapter has to create its bucket.
const BUCKET_LOCATION: &str = "us";

/// A parsed storage-service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOperation {
    ListObjects { prefix: String },
    PutObject { name: String, content: String },
    GetObject { name: String },
    SeedSampleObjects,
}

impl StorageOperation {
    /// Resolve an operation name and its parameters.  Missing parameters
    /// default to the empty string.
    pub fn parse(name: &str, params: &Map<String, Value>) -> Result<Self> {
        match name {
            actions::LIST_OBJECTS => Ok(Self::ListObjects {
                prefix: str_param(params, "prefix", "").to_string(),
            }),
            actions::PUT_OBJECT => Ok(Self::PutObject {
                name: str_param(params, "name", "").to_string(),
                content: str_param(params, "content", "").to_string(),
            }),
            actions::GET_OBJECT => Ok(Self::GetObject {
                name: str_param(params, "name", "").to_string(),
            }),
            actions::SEED_SAMPLE_OBJECTS => Ok(Self::SeedSampleObjects),
            other => Err(AdapterError::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

/// Adapter that fronts an [`ObjectStore`].
pub struct StorageAdapter {
    id: String,
    store: Arc<dyn ObjectStore>,
    connected: bool,
    setup_error: Option<String>,
}

impl StorageAdapter {
    pub fn new(id: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            id: id.into(),
            store,
            connected: false,
            setup_error: None,
        }
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    /// The bucket setup failure recorded by `connect`, if any.
    pub fn setup_error(&self) -> Option<&str> {
        self.setup_error.as_deref()
    }

    async fn ensure_bucket(&self) -> Result<()> {
        if self.store.bucket_exists().await? {
            info!(bucket = %self.store.bucket(), "using existing bucket");
        } else {
            self.store.create_bucket(BUCKET_LOCATION).await?;
            info!(bucket = %self.store.bucket(), "created bucket");
        }
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Value> {
        let objects = self.store.list_objects(prefix).await?;
        info!(adapter = %self.id, count = objects.len(), "files found in bucket");
        let files: Vec<Value> = objects
            .into_iter()
            .map(|meta| {
                json!({
                    "name": meta.name,
                    "size": meta.size,
                    "updated": meta.updated.map(|t| t.to_rfc3339()),
                })
            })
            .collect();
        Ok(json!({ "files": files }))
    }

    async fn put_object(&self, name: &str, content: &str) -> Result<Value> {
        self.store.put_object(name, content).await?;
        info!(adapter = %self.id, object = name, "uploaded file");
        Ok(json!({ "message": format!("File {name} uploaded successfully") }))
    }

    async fn get_object(&self, name: &str) -> Result<Value> {
        let content = self
            .store
            .get_object(name)
            .await?
            .ok_or_else(|| AdapterError::NotFound {
                name: name.to_string(),
            })?;
        debug!(adapter = %self.id, object = name, chars = content.len(), "downloaded file");
        Ok(json!({ "content": content }))
    }

    /// Upload every sample document.  Individual failures are reported per
    /// file; the operation itself always succeeds.
    async fn seed_sample_objects(&self) -> Value {
        let mut uploaded = Vec::with_capacity(SAMPLE_DOCUMENTS.len());
        for (name, content) in SAMPLE_DOCUMENTS {
            let success = match self.put_object(name, content).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(adapter = %self.id, object = name, error = %e, "sample upload failed");
                    false
                }
            };
            uploaded.push(json!({ "file": name, "success": success }));
        }
        json!({ "uploaded_files": uploaded })
    }
}

#[async_trait]
impl ServiceAdapter for StorageAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn service(&self) -> ServiceKind {
        ServiceKind::Storage
    }

    async fn connect(&mut self) -> Result<()> {
        self.setup_error = match self.ensure_bucket().await {
            Ok(()) => None,
            Err(e) => {
                warn!(bucket = %self.store.bucket(), error = %e, "bucket setup failed");
                Some(e.to_string())
            }
        };
        info!(id = %self.id, bucket = %self.store.bucket(), "storage adapter connected");
        self.connected = true;
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match (self.connected, &self.setup_error) {
            (false, _) => HealthStatus::Unhealthy,
            (true, Some(_)) => HealthStatus::Degraded,
            (true, None) => HealthStatus::Healthy,
        }
    }

    fn operations(&self) -> Vec<OperationDefinition> {
        vec![
            OperationDefinition {
                name: actions::LIST_OBJECTS.into(),
                description: "List objects in the bucket".into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "prefix": {
                            "type": "string",
                            "description": "Only list names starting with this prefix"
                        }
                    }
                }),
            },
            OperationDefinition {
                name: actions::PUT_OBJECT.into(),
                description: "Upload text content under an object name".into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Object name" },
                        "content": { "type": "string", "description": "Text to store" }
                    },
                    "required": ["name", "content"]
                }),
            },
            OperationDefinition {
                name: actions::GET_OBJECT.into(),
                description: "Download an object as text".into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Object name" }
                    },
                    "required": ["name"]
                }),
            },
            OperationDefinition {
                name: actions::SEED_SAMPLE_OBJECTS.into(),
                description: "Upload the sample contract, report and policy documents".into(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
        ]
    }

    async fn execute(&self, operation: &str, params: &Map<String, Value>) -> ServiceResult {
        if !self.connected {
            return AdapterError::NotConnected {
                adapter: self.id.clone(),
            }
            .into();
        }
        let op = match StorageOperation::parse(operation, params) {
            Ok(op) => op,
            Err(e) => {
                warn!(adapter = %self.id, operation, "unknown operation");
                return e.into();
            }
        };
        match op {
            StorageOperation::ListObjects { prefix } => self.list_objects(&prefix).await.into(),
            StorageOperation::PutObject { name, content } => {
                self.put_object(&name, &content).await.into()
            }
            StorageOperation::GetObject { name } => self.get_object(&name).await.into(),
            StorageOperation::SeedSampleObjects => {
                ServiceResult::success(self.seed_sample_objects().await)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryObjectStore;

    fn params(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    async fn connected(store: Arc<MemoryObjectStore>) -> StorageAdapter {
        let mut adapter = StorageAdapter::new("storage-test", store);
        adapter.connect().await.unwrap();
        adapter
    }

    #[test]
    fn parse_defaults_to_empty_strings() {
        let op = StorageOperation::parse("get_object", &Map::new()).unwrap();
        assert_eq!(op, StorageOperation::GetObject { name: String::new() });
    }

    #[tokio::test]
    async fn connect_creates_missing_bucket() {
        let store = Arc::new(MemoryObjectStore::new("demo-rag-documents"));
        let adapter = connected(store.clone()).await;
        assert!(store.bucket_created());
        assert_eq!(adapter.health_check().await, HealthStatus::Healthy);
        assert_eq!(adapter.bucket(), "demo-rag-documents");
    }

    #[tokio::test]
    async fn bucket_failure_degrades_but_does_not_abort() {
        let store = Arc::new(MemoryObjectStore::new("b"));
        store.fail_bucket_creation("permission denied");
        let adapter = connected(store).await;
        assert_eq!(adapter.health_check().await, HealthStatus::Degraded);
        assert_eq!(adapter.setup_error(), Some("permission denied"));
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = Arc::new(MemoryObjectStore::with_existing_bucket("b"));
        let adapter = connected(store).await;

        let put = adapter
            .execute("put_object", &params(&[("name", "notes.txt"), ("content", "hello")]))
            .await;
        assert_eq!(
            put.get("message"),
            Some(&json!("File notes.txt uploaded successfully"))
        );

        let got = adapter
            .execute("get_object", &params(&[("name", "notes.txt")]))
            .await;
        assert_eq!(got.get("content"), Some(&json!("hello")));
    }

    #[tokio::test]
    async fn get_missing_object_fails_with_not_found() {
        let adapter = connected(Arc::new(MemoryObjectStore::with_existing_bucket("b"))).await;
        let result = adapter
            .execute("get_object", &params(&[("name", "ghost.txt")]))
            .await;
        assert_eq!(result.error(), Some("File ghost.txt not found"));
    }

    #[tokio::test]
    async fn seed_reports_each_file() {
        let store = Arc::new(MemoryObjectStore::with_existing_bucket("b"));
        let adapter = connected(store.clone()).await;

        let result = adapter.execute("seed_sample_objects", &Map::new()).await;
        assert!(result.is_success());
        let files = result.get("uploaded_files").unwrap().as_array().unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f["success"] == json!(true)));
        assert_eq!(store.object_names().len(), 3);
    }

    #[tokio::test]
    async fn seed_succeeds_even_when_uploads_fail() {
        let store = Arc::new(MemoryObjectStore::with_existing_bucket("b"));
        let adapter = connected(store.clone()).await;
        store.fail_with("quota exceeded");

        let result = adapter.execute("seed_sample_objects", &Map::new()).await;
        assert!(result.is_success());
        let files = result.get("uploaded_files").unwrap().as_array().unwrap();
        assert!(files.iter().all(|f| f["success"] == json!(false)));
    }

    #[tokio::test]
    async fn list_objects_shape() {
        let store = Arc::new(MemoryObjectStore::with_existing_bucket("b"));
        let adapter = connected(store).await;
        adapter.execute("seed_sample_objects", &Map::new()).await;

        let result = adapter
            .execute("list_objects", &params(&[("prefix", "reports/")]))
            .await;
        let files = result.get("files").unwrap().as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["name"], "reports/q4_2024_report.txt");
        assert!(files[0]["size"].as_u64().unwrap() > 0);
        assert!(files[0]["updated"].is_string());
    }
}
