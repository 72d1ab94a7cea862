//! Build a [`Hub`] from [`HubConfig`].
//!
//! Backends follow `backend.kind` unless one is injected explicitly, which
//! is how tests swap in pre-seeded or failing in-memory stores.

use std::sync::Arc;

use tracing::info;

use intenthub_adapters::{
    AGGREGATE_GROUP_BY, BigQueryClient, GcsClient, MemoryObjectStore, MemoryWarehouse,
    ObjectStore, QueryAdapter, QueryBackend, ServiceAdapter, StorageAdapter,
};
use intenthub_intent::PatternCatalog;

use crate::config::{BackendKind, HubConfig};
use crate::error::Result;
use crate::orchestrator::Hub;

/// Adapter ids used in logs.
pub const QUERY_ADAPTER_ID: &str = "query";
pub const STORAGE_ADAPTER_ID: &str = "storage";

pub struct HubBuilder {
    config: HubConfig,
    query_backend: Option<Arc<dyn QueryBackend>>,
    object_store: Option<Arc<dyn ObjectStore>>,
}

impl HubBuilder {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            query_backend: None,
            object_store: None,
        }
    }

    /// Use `backend` instead of the configured one.
    pub fn query_backend(mut self, backend: Arc<dyn QueryBackend>) -> Self {
        self.query_backend = Some(backend);
        self
    }

    /// Use `store` instead of the configured one.
    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    /// Validate the config, create the backends, connect the adapters.
    pub async fn build(self) -> Result<Hub> {
        let Self {
            config,
            query_backend,
            object_store,
        } = self;
        config.validate()?;

        let gcp = &config.gcp;
        let kind = config.backend.kind;
        info!(
            backend = ?kind,
            project = %gcp.project_id,
            bucket = %gcp.bucket_name(),
            "building hub"
        );

        let query_backend: Arc<dyn QueryBackend> = match query_backend {
            Some(backend) => backend,
            None => match kind {
                BackendKind::Gcp => Arc::new(BigQueryClient::new(gcp.bigquery_config())?),
                BackendKind::Memory => Arc::new(offline_warehouse()),
            },
        };
        let object_store: Arc<dyn ObjectStore> = match object_store {
            Some(store) => store,
            None => match kind {
                BackendKind::Gcp => Arc::new(GcsClient::new(gcp.gcs_config())?),
                BackendKind::Memory => Arc::new(MemoryObjectStore::new(gcp.bucket_name())),
            },
        };

        let adapters: Vec<Box<dyn ServiceAdapter>> = vec![
            Box::new(QueryAdapter::new(
                QUERY_ADAPTER_ID,
                gcp.query_adapter_config(),
                query_backend,
            )),
            Box::new(StorageAdapter::new(STORAGE_ADAPTER_ID, object_store)),
        ];

        let catalog = Arc::new(PatternCatalog::builtin()?);
        Hub::connect(catalog, adapters, config.history.max_entries).await
    }
}

/// The memory warehouse does not run SQL, so the aggregate report is
/// answered with the status breakdown of the sample claims.
fn offline_warehouse() -> MemoryWarehouse {
    MemoryWarehouse::new()
        .with_canned_rows(AGGREGATE_GROUP_BY, QueryAdapter::sample_aggregate_rows())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use intenthub_adapters::HealthStatus;

    use super::*;
    use crate::error::AgentError;

    fn memory_config() -> HubConfig {
        let mut config = HubConfig::default();
        config.backend.kind = BackendKind::Memory;
        config
    }

    #[tokio::test]
    async fn memory_backend_builds_healthy_hub() {
        let hub = HubBuilder::new(memory_config()).build().await.unwrap();
        let status = hub.status().await;
        assert_eq!(status.components.query_adapter, HealthStatus::Healthy);
        assert_eq!(status.components.storage_adapter, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn memory_backend_reports_sample_breakdown() {
        let hub = HubBuilder::new(memory_config()).build().await.unwrap();
        let response = hub
            .handle("Analyze claims data and generate report")
            .await
            .unwrap();
        let report = &response.service_results()[0];
        assert_eq!(report.action, "get_aggregate_report");
        assert_eq!(report.result.get("row_count"), Some(&serde_json::json!(3)));
        let data = report.result.get("data").unwrap();
        assert_eq!(data[1]["status"], "PENDING");
        assert_eq!(data[1]["total_amount"], 2750.0);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let mut config = memory_config();
        config.history.max_entries = 0;
        let err = HubBuilder::new(config).build().await.err().unwrap();
        assert!(matches!(err, AgentError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn injected_store_overrides_backend_kind() {
        let store = Arc::new(MemoryObjectStore::new("custom"));
        store.fail_bucket_creation("denied");
        let hub = HubBuilder::new(HubConfig::default())
            .query_backend(Arc::new(MemoryWarehouse::new()))
            .object_store(store)
            .build()
            .await
            .unwrap();
        assert_eq!(
            hub.status().await.components.storage_adapter,
            HealthStatus::Degraded
        );
    }
}
