//! In-memory [`QueryBackend`] for tests and offline runs.
//!
//! Datasets and tables are real in-process collections.  SQL is not
//! interpreted: a query returns the canned rows registered for the first
//! fragment it contains, or no rows at all.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{QueryBackend, TableField};
use crate::error::{AdapterError, Result};

/// A table held by [`MemoryWarehouse`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub schema: Vec<TableField>,
    pub rows: Vec<Value>,
}

#[derive(Default)]
struct WarehouseState {
    datasets: BTreeMap<String, BTreeMap<String, MemoryTable>>,
    canned: Vec<(String, Vec<Map<String, Value>>)>,
    executed: Vec<String>,
    failure: Option<String>,
}

/// In-process stand-in for the data warehouse.
#[derive(Default)]
pub struct MemoryWarehouse {
    state: Mutex<WarehouseState>,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create an empty dataset.
    pub fn with_dataset(self, name: impl Into<String>) -> Self {
        self.lock().datasets.entry(name.into()).or_default();
        self
    }

    /// Answer any query containing `fragment` with `rows`.
    pub fn with_canned_rows(
        self,
        fragment: impl Into<String>,
        rows: Vec<Map<String, Value>>,
    ) -> Self {
        self.lock().canned.push((fragment.into(), rows));
        self
    }

    /// Make every subsequent call fail with `message` until cleared.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// SQL statements executed so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.lock().executed.clone()
    }

    /// Snapshot of a table, if it exists.
    pub fn table(&self, dataset: &str, table: &str) -> Option<MemoryTable> {
        self.lock()
            .datasets
            .get(dataset)
            .and_then(|tables| tables.get(table))
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, WarehouseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(state: &WarehouseState) -> Result<()> {
        match &state.failure {
            Some(message) => Err(AdapterError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryBackend for MemoryWarehouse {
    async fn list_datasets(&self) -> Result<Vec<String>> {
        let state = self.lock();
        Self::check_failure(&state)?;
        Ok(state.datasets.keys().cloned().collect())
    }

    async fn create_dataset(&self, dataset: &str, _location: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_failure(&state)?;
        state.datasets.entry(dataset.to_string()).or_default();
        Ok(())
    }

    async fn create_table(
        &self,
        dataset: &str,
        table: &str,
        schema: &[TableField],
    ) -> Result<()> {
        let mut state = self.lock();
        Self::check_failure(&state)?;
        let tables = state
            .datasets
            .get_mut(dataset)
            .ok_or_else(|| AdapterError::Backend(format!("Not found: Dataset {dataset}")))?;
        tables.entry(table.to_string()).or_insert_with(|| MemoryTable {
            schema: schema.to_vec(),
            rows: Vec::new(),
        });
        Ok(())
    }

    async fn insert_rows(
        &self,
        dataset: &str,
        table: &str,
        rows: &[Value],
    ) -> Result<Vec<String>> {
        let mut state = self.lock();
        Self::check_failure(&state)?;
        let target = state
            .datasets
            .get_mut(dataset)
            .and_then(|tables| tables.get_mut(table))
            .ok_or_else(|| {
                AdapterError::Backend(format!("Not found: Table {dataset}.{table}"))
            })?;

        let mut rejected = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let missing: Vec<&str> = target
                .schema
                .iter()
                .filter(|f| f.mode == "REQUIRED" && row.get(&f.name).is_none_or(Value::is_null))
                .map(|f| f.name.as_str())
                .collect();
            if missing.is_empty() {
                target.rows.push(row.clone());
            } else {
                rejected.push(format!(
                    "row {index}: invalid: missing required field(s) {}",
                    missing.join(", ")
                ));
            }
        }
        Ok(rejected)
    }

    async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>> {
        let mut state = self.lock();
        state.executed.push(sql.to_string());
        Self::check_failure(&state)?;
        Ok(state
            .canned
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
