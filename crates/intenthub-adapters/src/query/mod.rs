//! Analytic query service: backend trait, REST and in-memory backends, and
//! the [`QueryAdapter`] that exposes them as named operations.

mod adapter;
mod bigquery;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub use adapter::{AGGREGATE_GROUP_BY, QueryAdapter, QueryAdapterConfig, QueryOperation};
pub use bigquery::{BigQueryClient, BigQueryConfig, DEFAULT_BIGQUERY_ENDPOINT};
pub(crate) use bigquery::google_error_message;
pub use memory::{MemoryTable, MemoryWarehouse};

/// One column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: String,
}

impl TableField {
    /// A `REQUIRED` column.
    pub fn required(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            mode: "REQUIRED".into(),
        }
    }
}

/// The operations the query adapter needs from a data warehouse.
///
/// Creation calls are exists-ok: creating something that already exists is
/// a success.  Nothing here retries.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Names of all datasets in the project.
    async fn list_datasets(&self) -> Result<Vec<String>>;

    /// Create a dataset in `location` unless it exists.
    async fn create_dataset(&self, dataset: &str, location: &str) -> Result<()>;

    /// Create a table with `schema` unless it exists.
    async fn create_table(&self, dataset: &str, table: &str, schema: &[TableField])
    -> Result<()>;

    /// Insert a batch of JSON rows.  Returns one description per rejected
    /// row; an empty vector means every row was accepted.
    async fn insert_rows(&self, dataset: &str, table: &str, rows: &[Value])
    -> Result<Vec<String>>;

    /// Run a SQL statement and return its rows as column-name maps.
    async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>>;
}
