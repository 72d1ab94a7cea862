//! Service adapters for IntentHub: analytic queries and object storage.
//!
//! Each adapter implements the [`ServiceAdapter`] trait defined in
//! [`traits`], giving a uniform interface for operation discovery and
//! execution.  Backends sit behind [`QueryBackend`] and [`ObjectStore`] so
//! the Google REST clients can be swapped for in-memory stores.

pub mod error;
pub mod query;
pub mod result;
pub mod storage;
pub mod traits;

pub use error::{AdapterError, Result};
pub use query::{
    AGGREGATE_GROUP_BY, BigQueryClient, BigQueryConfig, MemoryWarehouse, QueryAdapter,
    QueryAdapterConfig, QueryBackend, TableField,
};
pub use result::ServiceResult;
pub use storage::{
    GcsClient, GcsConfig, MemoryObjectStore, ObjectMeta, ObjectStore, SAMPLE_DOCUMENTS,
    StorageAdapter,
};
pub use traits::{HealthStatus, OperationDefinition, ServiceAdapter};
