//! In-memory hub and spec store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kube::core::ErrorResponse;
use kube::{Resource, ResourceExt};
use sea_orm::DbErr;
use serde_json::Value;

use hub_spec_sync::db::{DatabaseError, SpecStore};
use hub_spec_sync::hub::{HubApi, HubError, ObjectKey};

// ============================================================================
// Hub
// ============================================================================

/// Hub holding instances of one kind.
///
/// `update_finalizers` behaves like a merge patch on the API server: only
/// the finalizer list is applied, the resource version is bumped, and a
/// terminating instance whose last finalizer is removed disappears.
pub struct FakeHub<K> {
    objects: Mutex<HashMap<ObjectKey, K>>,
    gets: AtomicUsize,
    updates: AtomicUsize,
    fail_get: Mutex<Option<String>>,
    fail_update: Mutex<Option<u16>>,
}

impl<K> FakeHub<K>
where
    K: Resource + Clone + Send + Sync + 'static,
{
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            fail_get: Mutex::new(None),
            fail_update: Mutex::new(None),
        })
    }

    pub fn put(&self, instance: K) {
        let key = ObjectKey::from_resource(&instance);
        self.objects.lock().unwrap().insert(key, instance);
    }

    /// Applies `change` to the stored instance, as another client would.
    pub fn edit(&self, key: &ObjectKey, change: impl FnOnce(&mut K)) {
        let mut objects = self.objects.lock().unwrap();
        let instance = objects.get_mut(key).expect("instance exists");
        change(instance);
    }

    pub fn remove(&self, key: &ObjectKey) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn current(&self, key: &ObjectKey) -> Option<K> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn finalizers(&self, key: &ObjectKey) -> Vec<String> {
        self.current(key)
            .map(|instance| instance.finalizers().to_vec())
            .unwrap_or_default()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Makes every following `get` fail with a transport error.
    pub fn fail_gets(&self, message: &str) {
        *self.fail_get.lock().unwrap() = Some(message.to_string());
    }

    /// Makes every following `update_finalizers` fail with the given HTTP status.
    pub fn fail_updates(&self, code: u16) {
        *self.fail_update.lock().unwrap() = Some(code);
    }

    pub fn heal(&self) {
        *self.fail_get.lock().unwrap() = None;
        *self.fail_update.lock().unwrap() = None;
    }
}

#[async_trait]
impl<K> HubApi<K> for FakeHub<K>
where
    K: Resource + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &ObjectKey) -> Result<Option<K>, HubError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_get.lock().unwrap().clone() {
            return Err(HubError::Api(kube::Error::Service(message.into())));
        }
        Ok(self.current(key))
    }

    async fn update_finalizers(&self, instance: &K) -> Result<K, HubError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = *self.fail_update.lock().unwrap() {
            return Err(api_error(code));
        }

        let key = ObjectKey::from_resource(instance);
        let mut objects = self.objects.lock().unwrap();
        let Some(mut stored) = objects.get(&key).cloned() else {
            return Err(api_error(404));
        };

        // Only the finalizer list is taken from the caller.
        stored.meta_mut().finalizers = Some(instance.finalizers().to_vec());
        let version = stored
            .resource_version()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        stored.meta_mut().resource_version = Some((version + 1).to_string());

        if stored.meta().deletion_timestamp.is_some() && stored.finalizers().is_empty() {
            objects.remove(&key);
        } else {
            objects.insert(key, stored.clone());
        }
        Ok(stored)
    }
}

fn api_error(code: u16) -> HubError {
    let reason = match code {
        404 => "NotFound",
        409 => "Conflict",
        _ => "InternalError",
    };
    HubError::Api(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: "injected failure".to_string(),
        reason: reason.to_string(),
        code,
    }))
}

// ============================================================================
// Spec store
// ============================================================================

/// A row of a spec table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub payload: Value,
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Insert,
    Update,
    MarkDeleted,
}

/// Spec tables kept in memory, keyed by `(table, id)`.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<(String, String), Row>>,
    calls: Mutex<Vec<StoreOp>>,
    failing: Mutex<Option<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, table: &str, id: &str, payload: Value, deleted: bool) {
        self.rows
            .lock()
            .unwrap()
            .insert((table.to_string(), id.to_string()), Row { payload, deleted });
    }

    pub fn row(&self, table: &str, id: &str) -> Option<Row> {
        self.rows
            .lock()
            .unwrap()
            .get(&(table.to_string(), id.to_string()))
            .cloned()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.rows
            .lock()
            .unwrap()
            .keys()
            .filter(|(t, _)| t == table)
            .count()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls that write (insert, update, mark deleted).
    pub fn write_count(&self) -> usize {
        self.calls()
            .into_iter()
            .filter(|op| *op != StoreOp::Get)
            .count()
    }

    pub fn fail_on(&self, op: StoreOp) {
        *self.failing.lock().unwrap() = Some(op);
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = None;
    }

    fn record(&self, op: StoreOp) -> Result<(), DatabaseError> {
        self.calls.lock().unwrap().push(op);
        if *self.failing.lock().unwrap() == Some(op) {
            return Err(DatabaseError::Db(DbErr::Custom(format!(
                "injected {:?} failure",
                op
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl SpecStore for MemoryStore {
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, DatabaseError> {
        self.record(StoreOp::Get)?;
        Ok(self.row(table, id).map(|row| row.payload))
    }

    async fn insert(&self, table: &str, id: &str, payload: &Value) -> Result<(), DatabaseError> {
        self.record(StoreOp::Insert)?;
        let mut rows = self.rows.lock().unwrap();
        let key = (table.to_string(), id.to_string());
        if rows.contains_key(&key) {
            return Err(DatabaseError::Db(DbErr::Custom(format!(
                "duplicate key value violates unique constraint: {}",
                id
            ))));
        }
        rows.insert(
            key,
            Row {
                payload: payload.clone(),
                deleted: false,
            },
        );
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, payload: &Value) -> Result<(), DatabaseError> {
        self.record(StoreOp::Update)?;
        if let Some(row) = self
            .rows
            .lock()
            .unwrap()
            .get_mut(&(table.to_string(), id.to_string()))
        {
            row.payload = payload.clone();
        }
        Ok(())
    }

    async fn mark_deleted(
        &self,
        table: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<u64, DatabaseError> {
        self.record(StoreOp::MarkDeleted)?;
        let mut flipped = 0;
        for ((t, _), row) in self.rows.lock().unwrap().iter_mut() {
            let metadata = &row.payload["metadata"];
            let matches = t == table
                && metadata["name"].as_str() == Some(name)
                && metadata["namespace"].as_str() == namespace
                && !row.deleted;
            if matches {
                row.deleted = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}
