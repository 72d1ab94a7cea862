//! In-memory [`ObjectStore`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::{ObjectMeta, ObjectStore};
use crate::error::{AdapterError, Result};

#[derive(Default)]
struct StoreState {
    bucket_created: bool,
    objects: BTreeMap<String, (String, ObjectMeta)>,
    failure: Option<String>,
    bucket_failure: Option<String>,
}

/// Single-bucket object store held in process memory.
pub struct MemoryObjectStore {
    bucket: String,
    state: Mutex<StoreState>,
}

impl MemoryObjectStore {
    /// A store whose bucket does not exist yet.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// A store whose bucket already exists.
    pub fn with_existing_bucket(bucket: impl Into<String>) -> Self {
        let store = Self::new(bucket);
        store.lock().bucket_created = true;
        store
    }

    /// Make every object call fail with `message` until cleared.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// Make bucket creation fail with `message`.
    pub fn fail_bucket_creation(&self, message: impl Into<String>) {
        self.lock().bucket_failure = Some(message.into());
    }

    pub fn bucket_created(&self) -> bool {
        self.lock().bucket_created
    }

    /// Names of every stored object, in order.
    pub fn object_names(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(state: &StoreState) -> Result<()> {
        match &state.failure {
            Some(message) => Err(AdapterError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> Result<bool> {
        Ok(self.lock().bucket_created)
    }

    async fn create_bucket(&self, _location: &str) -> Result<()> {
        let mut state = self.lock();
        if let Some(message) = &state.bucket_failure {
            return Err(AdapterError::Backend(message.clone()));
        }
        state.bucket_created = true;
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let state = self.lock();
        Self::check_failure(&state)?;
        Ok(state
            .objects
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(_, (_, meta))| meta.clone())
            .collect())
    }

    async fn put_object(&self, name: &str, content: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_failure(&state)?;
        let meta = ObjectMeta {
            name: name.to_string(),
            size: content.len() as u64,
            updated: Some(Utc::now()),
        };
        state
            .objects
            .insert(name.to_string(), (content.to_string(), meta));
        Ok(())
    }

    async fn get_object(&self, name: &str) -> Result<Option<String>> {
        let state = self.lock();
        Self::check_failure(&state)?;
        Ok(state.objects.get(name).map(|(content, _)| content.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
