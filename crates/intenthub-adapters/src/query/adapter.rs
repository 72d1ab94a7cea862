//! Query service adapter.
//!
//! Exposes the warehouse as four named operations: `run_query`,
//! `list_collections`, `create_sample_dataset` and `get_aggregate_report`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use intenthub_intent::{ServiceKind, actions};

use super::{QueryBackend, TableField};
use crate::error::{AdapterError, Result};
use crate::result::ServiceResult;
use crate::traits::{HealthStatus, OperationDefinition, ServiceAdapter, str_param};

/// Where the sample claims table lives.
#[derive(Debug, Clone)]
pub struct QueryAdapterConfig {
    pub project_id: String,
    pub dataset_id: String,
    pub sample_table: String,
    pub location: String,
}

impl Default for QueryAdapterConfig {
    fn default() -> Self {
        Self {
            project_id: "your-project-id".into(),
            dataset_id: "enterprise_rag".into(),
            sample_table: "sample_claims".into(),
            location: "US".into(),
        }
    }
}

/// A parsed query-service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOperation {
    RunQuery { sql: String },
    ListCollections,
    CreateSampleDataset,
    GetAggregateReport,
}

impl QueryOperation {
    /// Resolve an operation name and its parameters.  Missing parameters
    /// take their defaults; unknown names are an error.
    pub fn parse(name: &str, params: &Map<String, Value>) -> Result<Self> {
        match name {
            actions::RUN_QUERY => Ok(Self::RunQuery {
                sql: str_param(params, "sql", "SELECT 1").to_string(),
            }),
            actions::LIST_COLLECTIONS => Ok(Self::ListCollections),
            actions::CREATE_SAMPLE_DATASET => Ok(Self::CreateSampleDataset),
            actions::GET_AGGREGATE_REPORT => Ok(Self::GetAggregateReport),
            other => Err(AdapterError::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

/// Clause shared by every aggregate report query.
pub const AGGREGATE_GROUP_BY: &str = "GROUP BY status";

/// Adapter that fronts a [`QueryBackend`].
pub struct QueryAdapter {
    id: String,
    config: QueryAdapterConfig,
    backend: Arc<dyn QueryBackend>,
    connected: bool,
}

impl QueryAdapter {
    pub fn new(
        id: impl Into<String>,
        config: QueryAdapterConfig,
        backend: Arc<dyn QueryBackend>,
    ) -> Self {
        Self {
            id: id.into(),
            config,
            backend,
            connected: false,
        }
    }

    pub fn config(&self) -> &QueryAdapterConfig {
        &self.config
    }

    /// Schema of the sample claims table.
    pub fn sample_schema() -> Vec<TableField> {
        vec![
            TableField::required("claim_id", "STRING"),
            TableField::required("amount", "FLOAT"),
            TableField::required("status", "STRING"),
            TableField::required("customer_id", "STRING"),
            TableField::required("date_submitted", "DATE"),
        ]
    }

    /// The three claims inserted by `create_sample_dataset`.
    pub fn sample_rows() -> Vec<Value> {
        vec![
            json!({"claim_id": "CLM001", "amount": 1500.0, "status": "APPROVED", "customer_id": "CUST001", "date_submitted": "2024-01-15"}),
            json!({"claim_id": "CLM002", "amount": 2750.0, "status": "PENDING", "customer_id": "CUST002", "date_submitted": "2024-01-16"}),
            json!({"claim_id": "CLM003", "amount": 500.0, "status": "REJECTED", "customer_id": "CUST001", "date_submitted": "2024-01-17"}),
        ]
    }

    /// Status breakdown over the sample claims table.
    pub fn aggregate_sql(&self) -> String {
        format!(
            "SELECT status, COUNT(*) as claim_count, AVG(amount) as avg_amount, \
             SUM(amount) as total_amount FROM `{}.{}.{}` {AGGREGATE_GROUP_BY}",
            self.config.project_id, self.config.dataset_id, self.config.sample_table
        )
    }

    /// The rows [`aggregate_sql`](Self::aggregate_sql) yields over
    /// [`sample_rows`](Self::sample_rows), one per status in first-seen
    /// order.
    pub fn sample_aggregate_rows() -> Vec<Map<String, Value>> {
        let mut groups: Vec<(String, u64, f64)> = Vec::new();
        for row in Self::sample_rows() {
            let status = row["status"].as_str().unwrap_or_default().to_string();
            let amount = row["amount"].as_f64().unwrap_or_default();
            match groups.iter_mut().find(|(s, _, _)| *s == status) {
                Some((_, count, total)) => {
                    *count += 1;
                    *total += amount;
                }
                None => groups.push((status, 1, amount)),
            }
        }
        groups
            .into_iter()
            .map(|(status, count, total)| {
                let mut row = Map::new();
                row.insert("status".into(), json!(status));
                row.insert("claim_count".into(), json!(count));
                row.insert("avg_amount".into(), json!(total / count as f64));
                row.insert("total_amount".into(), json!(total));
                row
            })
            .collect()
    }

    async fn run_query(&self, sql: &str) -> ServiceResult {
        debug!(adapter = %self.id, sql, "executing query");
        match self.backend.run_query(sql).await {
            Ok(rows) => {
                info!(adapter = %self.id, rows = rows.len(), "query returned");
                let row_count = rows.len();
                ServiceResult::success(json!({ "data": rows, "row_count": row_count }))
            }
            Err(e) => {
                warn!(adapter = %self.id, error = %e, "query failed");
                ServiceResult::failure(format!("Query failed: {e}"))
            }
        }
    }

    async fn list_collections(&self) -> Result<Value> {
        let datasets = self.backend.list_datasets().await?;
        info!(adapter = %self.id, count = datasets.len(), "datasets found");
        Ok(json!({ "datasets": datasets }))
    }

    async fn create_sample_dataset(&self) -> Result<Value> {
        let QueryAdapterConfig {
            dataset_id,
            sample_table,
            location,
            ..
        } = &self.config;

        self.backend.create_dataset(dataset_id, location).await?;
        debug!(dataset = %dataset_id, "dataset ready");

        self.backend
            .create_table(dataset_id, sample_table, &Self::sample_schema())
            .await?;
        debug!(table = %sample_table, "table ready");

        let rejected = self
            .backend
            .insert_rows(dataset_id, sample_table, &Self::sample_rows())
            .await?;
        if !rejected.is_empty() {
            return Err(AdapterError::InsertRejected(rejected.join("; ")));
        }

        info!(adapter = %self.id, table = %sample_table, "sample table populated");
        Ok(json!({ "message": "Sample table created successfully" }))
    }

    async fn get_aggregate_report(&self) -> ServiceResult {
        if let Err(e) = self.create_sample_dataset().await {
            debug!(adapter = %self.id, error = %e, "sample setup before report failed");
        }
        self.run_query(&self.aggregate_sql()).await
    }
}

#[async_trait]
impl ServiceAdapter for QueryAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn service(&self) -> ServiceKind {
        ServiceKind::Query
    }

    async fn connect(&mut self) -> Result<()> {
        info!(id = %self.id, project = %self.config.project_id, "query adapter connected");
        self.connected = true;
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        if self.connected {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }

    fn operations(&self) -> Vec<OperationDefinition> {
        vec![
            OperationDefinition {
                name: actions::RUN_QUERY.into(),
                description: "Execute a SQL statement and return its rows".into(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "sql": {
                            "type": "string",
                            "description": "Standard SQL text (default: SELECT 1)"
                        }
                    }
                }),
            },
            OperationDefinition {
                name: actions::LIST_COLLECTIONS.into(),
                description: "List the datasets in the project".into(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
            OperationDefinition {
                name: actions::CREATE_SAMPLE_DATASET.into(),
                description: "Create the sample claims table and insert demo rows".into(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
            OperationDefinition {
                name: actions::GET_AGGREGATE_REPORT.into(),
                description: "Claim counts and amounts grouped by status".into(),
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
        let op = match QueryOperation::parse(operation, params) {
            Ok(op) => op,
            Err(e) => {
                warn!(adapter = %self.id, operation, "unknown operation");
                return e.into();
            }
        };
        match op {
            QueryOperation::RunQuery { sql } => self.run_query(&sql).await,
            QueryOperation::ListCollections => self.list_collections().await.into(),
            QueryOperation::CreateSampleDataset => self.create_sample_dataset().await.into(),
            QueryOperation::GetAggregateReport => self.get_aggregate_report().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MemoryWarehouse;

    async fn connected(warehouse: Arc<MemoryWarehouse>) -> QueryAdapter {
        let mut adapter = QueryAdapter::new("query-test", QueryAdapterConfig::default(), warehouse);
        adapter.connect().await.unwrap();
        adapter
    }

    #[test]
    fn parse_defaults_sql() {
        let op = QueryOperation::parse("run_query", &Map::new()).unwrap();
        assert_eq!(op, QueryOperation::RunQuery { sql: "SELECT 1".into() });
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = QueryOperation::parse("list_datasets", &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown method: list_datasets");
    }

    #[test]
    fn operations_list() {
        let adapter = QueryAdapter::new(
            "query-test",
            QueryAdapterConfig::default(),
            Arc::new(MemoryWarehouse::new()),
        );
        let names: Vec<String> = adapter.operations().into_iter().map(|o| o.name).collect();
        assert_eq!(
            names,
            [
                "run_query",
                "list_collections",
                "create_sample_dataset",
                "get_aggregate_report"
            ]
        );
    }

    #[test]
    fn aggregate_sql_targets_configured_table() {
        let adapter = QueryAdapter::new(
            "query-test",
            QueryAdapterConfig {
                project_id: "acme".into(),
                ..Default::default()
            },
            Arc::new(MemoryWarehouse::new()),
        );
        let sql = adapter.aggregate_sql();
        assert!(sql.contains("FROM `acme.enterprise_rag.sample_claims`"));
        assert!(sql.ends_with("GROUP BY status"));
    }

    #[test]
    fn sample_aggregate_rows_group_the_sample_claims() {
        let rows = QueryAdapter::sample_aggregate_rows();
        assert_eq!(
            json!(rows),
            json!([
                {"status": "APPROVED", "claim_count": 1, "avg_amount": 1500.0, "total_amount": 1500.0},
                {"status": "PENDING", "claim_count": 1, "avg_amount": 2750.0, "total_amount": 2750.0},
                {"status": "REJECTED", "claim_count": 1, "avg_amount": 500.0, "total_amount": 500.0}
            ])
        );
    }

    #[tokio::test]
    async fn health_follows_connection() {
        let mut adapter = QueryAdapter::new(
            "query-test",
            QueryAdapterConfig::default(),
            Arc::new(MemoryWarehouse::new()),
        );
        assert_eq!(adapter.health_check().await, HealthStatus::Unhealthy);
        let result = adapter.execute("run_query", &Map::new()).await;
        assert_eq!(result.error(), Some("adapter `query-test` is not connected"));

        adapter.connect().await.unwrap();
        assert_eq!(adapter.health_check().await, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn create_sample_dataset_populates_table() {
        let warehouse = Arc::new(MemoryWarehouse::new());
        let adapter = connected(warehouse.clone()).await;

        let result = adapter.execute("create_sample_dataset", &Map::new()).await;
        assert_eq!(
            result.get("message"),
            Some(&json!("Sample table created successfully"))
        );
        let table = warehouse.table("enterprise_rag", "sample_claims").unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.schema.len(), 5);
        assert_eq!(table.rows[1]["claim_id"], "CLM002");
    }

    #[tokio::test]
    async fn run_query_reports_rows_and_count() {
        let mut row = Map::new();
        row.insert("one".into(), json!(1));
        let warehouse = Arc::new(MemoryWarehouse::new().with_canned_rows("SELECT 1", vec![row]));
        let adapter = connected(warehouse).await;

        let result = adapter.execute("run_query", &Map::new()).await;
        assert!(result.is_success());
        assert_eq!(result.get("row_count"), Some(&json!(1)));
        assert_eq!(result.get("data"), Some(&json!([{"one": 1}])));
    }

    #[tokio::test]
    async fn run_query_failure_is_prefixed() {
        let warehouse = Arc::new(MemoryWarehouse::new());
        warehouse.fail_with("Syntax error at [1:1]");
        let adapter = connected(warehouse).await;

        let result = adapter.execute("run_query", &Map::new()).await;
        assert_eq!(result.error(), Some("Query failed: Syntax error at [1:1]"));
    }

    #[tokio::test]
    async fn aggregate_report_sets_up_table_first() {
        let warehouse = Arc::new(MemoryWarehouse::new());
        let adapter = connected(warehouse.clone()).await;

        let result = adapter.execute("get_aggregate_report", &Map::new()).await;
        assert!(result.is_success());
        assert_eq!(result.get("row_count"), Some(&json!(0)));
        assert!(warehouse.table("enterprise_rag", "sample_claims").is_some());
        let executed = warehouse.executed_queries();
        assert_eq!(executed.len(), 1);
        assert!(executed[0].contains("GROUP BY status"));
    }

    #[tokio::test]
    async fn list_collections_returns_dataset_names() {
        let warehouse = Arc::new(MemoryWarehouse::new().with_dataset("finance"));
        let adapter = connected(warehouse).await;

        let result = adapter.execute("list_collections", &Map::new()).await;
        assert_eq!(result.get("datasets"), Some(&json!(["finance"])));
    }
}
