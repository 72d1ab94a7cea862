//! Object storage service: backend trait, GCS and in-memory backends, and the
//! [`StorageAdapter`] that exposes them as named operations.

mod adapter;
mod gcs;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use adapter::{StorageAdapter, StorageOperation};
pub use gcs::{DEFAULT_STORAGE_ENDPOINT, GcsClient, GcsConfig};
pub use memory::MemoryObjectStore;

/// The three documents written by `seed_sample_objects`, as `(name, content)`.
pub const SAMPLE_DOCUMENTS: [(&str, &str); 3] = [
    (
        "contracts/contract_001.txt",
        "CONTRACT AGREEMENT\nParties: Company A & Vendor B\nValue: $50,000\nTerm: 12 months\nRisk Level: Medium",
    ),
    (
        "reports/q4_2024_report.txt",
        "Q4 2024 FINANCIAL REPORT\nRevenue: $1.2M\nExpenses: $800K\nProfit: $400K\nKey Metric: 15% growth",
    ),
    (
        "policies/security_policy.txt",
        "SECURITY POLICY DOCUMENT\nCompliance: ISO 27001\nLast Review: 2024-01-15\nStatus: Active",
    ),
];

/// Listing entry for one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub size: u64,
    pub updated: Option<DateTime<Utc>>,
}

/// Bucket-scoped object operations.  Each store is bound to one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store writes to.
    fn bucket(&self) -> &str;

    async fn bucket_exists(&self) -> Result<bool>;

    async fn create_bucket(&self, location: &str) -> Result<()>;

    /// Objects whose names start with `prefix`, in name order.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>>;

    /// Write `content` under `name`, replacing any existing object.
    async fn put_object(&self, name: &str, content: &str) -> Result<()>;

    /// Read an object as text.  `None` when it does not exist.
    async fn get_object(&self, name: &str) -> Result<Option<String>>;
}
