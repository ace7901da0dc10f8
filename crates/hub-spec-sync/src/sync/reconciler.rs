//! Generic reconciler: hub instance → finalizer → spec row.
//!
//! One pass handles one instance key and is safe to repeat: every step
//! checks the current state before writing, so redelivered or duplicate
//! triggers converge on the same finalizer and row.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kube::{Resource, ResourceExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::clean::clean_metadata;
use super::error::{SyncError, SyncStep};
use super::strategy::SyncStrategy;
use crate::db::SpecStore;
use crate::hub::{HubApi, ObjectKey};

/// What a reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The instance no longer exists; `rows` live rows were flagged deleted.
    Tombstoned { rows: u64 },
    /// The instance is being deleted; its row was flagged and the finalizer released.
    Released,
    /// The instance is being deleted but carries no finalizer of ours.
    Terminating,
    /// The instance is excluded from syncing.
    Skipped,
    /// A new row was written.
    Inserted,
    /// The stored payload was stale and has been overwritten.
    Updated,
    /// The stored payload already matches.
    Unchanged,
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileOutcome::Tombstoned { rows } => write!(f, "tombstoned ({} rows)", rows),
            ReconcileOutcome::Released => f.write_str("released"),
            ReconcileOutcome::Terminating => f.write_str("terminating"),
            ReconcileOutcome::Skipped => f.write_str("skipped"),
            ReconcileOutcome::Inserted => f.write_str("inserted"),
            ReconcileOutcome::Updated => f.write_str("updated"),
            ReconcileOutcome::Unchanged => f.write_str("unchanged"),
        }
    }
}

/// Mirrors instances of one kind into that kind's spec table.
pub struct SpecReconciler<S: SyncStrategy> {
    strategy: S,
    hub: Arc<dyn HubApi<S::Kind>>,
    store: Arc<dyn SpecStore>,
    excluded_namespaces: Vec<String>,
}

impl<S: SyncStrategy> SpecReconciler<S> {
    pub fn new(strategy: S, hub: Arc<dyn HubApi<S::Kind>>, store: Arc<dyn SpecStore>) -> Self {
        Self {
            strategy,
            hub,
            store,
            excluded_namespaces: Vec::new(),
        }
    }

    /// Never syncs instances living in any of `namespaces`.
    pub fn with_excluded_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.excluded_namespaces = namespaces;
        self
    }

    /// Runs one reconcile pass for the instance at `key`.
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<ReconcileOutcome, SyncError> {
        let kind = S::KIND;

        let instance = self
            .hub
            .get(key)
            .await
            .map_err(|e| SyncError::hub(SyncStep::FetchInstance, kind, key, e))?;

        let Some(mut instance) = instance else {
            let rows = self.tombstone(key).await?;
            info!(kind = %kind, key = %key, rows, "Instance is gone, marked rows deleted");
            return Ok(ReconcileOutcome::Tombstoned { rows });
        };

        let finalizer = kind.finalizer();

        if instance.meta().deletion_timestamp.is_some() {
            if !has_finalizer(&instance, &finalizer) {
                debug!(kind = %kind, key = %key, "Instance is terminating without our finalizer");
                return Ok(ReconcileOutcome::Terminating);
            }

            let rows = self.tombstone(key).await?;
            remove_finalizer(&mut instance, &finalizer);
            self.hub
                .update_finalizers(&instance)
                .await
                .map_err(|e| SyncError::hub(SyncStep::RemoveFinalizer, kind, key, e))?;

            info!(kind = %kind, key = %key, rows, "Instance deleted, released finalizer");
            return Ok(ReconcileOutcome::Released);
        }

        if !self.includes(&instance) {
            debug!(kind = %kind, key = %key, "Instance excluded from sync");
            return Ok(ReconcileOutcome::Skipped);
        }

        let uid = instance
            .uid()
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| SyncError::MissingUid {
                kind,
                key: key.clone(),
            })?;

        if !has_finalizer(&instance, &finalizer) {
            add_finalizer(&mut instance, &finalizer);
            instance = self
                .hub
                .update_finalizers(&instance)
                .await
                .map_err(|e| SyncError::hub(SyncStep::AddFinalizer, kind, key, e))?;
            debug!(kind = %kind, key = %key, finalizer = %finalizer, "Added finalizer");
        }

        let mut cleaned = instance;
        clean_metadata(cleaned.meta_mut());
        self.strategy.clean_status(&mut cleaned);

        let payload = serde_json::to_value(&cleaned).map_err(|e| SyncError::Serialize {
            kind,
            key: key.clone(),
            source: e,
        })?;

        self.upsert(key, &uid, &cleaned, &payload).await
    }

    /// Reconciles `key` until a pass succeeds, waiting `retry_after` between
    /// failed passes.
    ///
    /// Used for keys the watch no longer delivers, which have no other way
    /// to be retried.
    pub async fn reconcile_until_settled(
        &self,
        key: &ObjectKey,
        retry_after: Duration,
    ) -> ReconcileOutcome {
        loop {
            match self.reconcile(key).await {
                Ok(outcome) => return outcome,
                Err(e) => {
                    warn!(
                        kind = %S::KIND,
                        key = %key,
                        error = %e,
                        retry_in_secs = retry_after.as_secs(),
                        "Reconcile failed, retrying"
                    );
                    tokio::time::sleep(retry_after).await;
                }
            }
        }
    }

    fn includes(&self, instance: &S::Kind) -> bool {
        let excluded = instance
            .meta()
            .namespace
            .as_ref()
            .is_some_and(|namespace| self.excluded_namespaces.contains(namespace));
        !excluded && self.strategy.should_process(instance)
    }

    async fn tombstone(&self, key: &ObjectKey) -> Result<u64, SyncError> {
        // Stored cluster-scoped payloads never carry a namespace.
        let namespace = if S::KIND.is_namespaced() {
            key.namespace.as_deref()
        } else {
            None
        };
        self.store
            .mark_deleted(S::KIND.table(), &key.name, namespace)
            .await
            .map_err(|e| SyncError::database(SyncStep::MarkRowDeleted, S::KIND, key.to_string(), e))
    }

    async fn upsert(
        &self,
        key: &ObjectKey,
        uid: &str,
        cleaned: &S::Kind,
        payload: &Value,
    ) -> Result<ReconcileOutcome, SyncError> {
        let kind = S::KIND;
        let table = kind.table();

        let stored = self
            .store
            .get(table, uid)
            .await
            .map_err(|e| SyncError::database(SyncStep::ReadRow, kind, uid, e))?;

        let Some(stored) = stored else {
            self.store
                .insert(table, uid, payload)
                .await
                .map_err(|e| SyncError::database(SyncStep::InsertRow, kind, uid, e))?;
            info!(kind = %kind, key = %key, id = uid, "Inserted spec row");
            return Ok(ReconcileOutcome::Inserted);
        };

        match serde_json::from_value::<S::Kind>(stored) {
            Ok(stored) if self.strategy.are_equal(&stored, cleaned) => {
                debug!(kind = %kind, key = %key, id = uid, "Spec row is up to date");
                return Ok(ReconcileOutcome::Unchanged);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    kind = %kind,
                    key = %key,
                    id = uid,
                    error = %e,
                    "Stored payload does not decode, overwriting"
                );
            }
        }

        self.store
            .update(table, uid, payload)
            .await
            .map_err(|e| SyncError::database(SyncStep::UpdateRow, kind, uid, e))?;
        info!(kind = %kind, key = %key, id = uid, "Updated spec row");
        Ok(ReconcileOutcome::Updated)
    }
}

fn has_finalizer<K: Resource>(instance: &K, finalizer: &str) -> bool {
    instance.finalizers().iter().any(|f| f == finalizer)
}

fn add_finalizer<K: Resource>(instance: &mut K, finalizer: &str) {
    instance
        .meta_mut()
        .finalizers
        .get_or_insert_with(Vec::new)
        .push(finalizer.to_string());
}

fn remove_finalizer<K: Resource>(instance: &mut K, finalizer: &str) {
    if let Some(finalizers) = instance.meta_mut().finalizers.as_mut() {
        finalizers.retain(|f| f != finalizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Policy, PolicySpec};
    use crate::sync::SyncedKind;

    #[test]
    fn test_finalizer_helpers() {
        let finalizer = SyncedKind::Policies.finalizer();
        let mut policy = Policy::new("p1", PolicySpec::default());
        assert!(!has_finalizer(&policy, &finalizer));

        add_finalizer(&mut policy, &finalizer);
        assert!(has_finalizer(&policy, &finalizer));
        assert_eq!(policy.finalizers().len(), 1);

        policy.finalizers_mut().push("example.com/other".to_string());
        remove_finalizer(&mut policy, &finalizer);
        assert!(!has_finalizer(&policy, &finalizer));
        assert_eq!(policy.finalizers(), ["example.com/other".to_string()]);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            ReconcileOutcome::Tombstoned { rows: 2 }.to_string(),
            "tombstoned (2 rows)"
        );
        assert_eq!(ReconcileOutcome::Unchanged.to_string(), "unchanged");
    }
}
