//! Reconciliation error types.

use std::fmt;

use thiserror::Error;

use super::SyncedKind;
use crate::db::DatabaseError;
use crate::hub::{HubError, ObjectKey};

/// The external call a reconcile pass was making when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    FetchInstance,
    AddFinalizer,
    RemoveFinalizer,
    ReadRow,
    InsertRow,
    UpdateRow,
    MarkRowDeleted,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            SyncStep::FetchInstance => "fetch instance",
            SyncStep::AddFinalizer => "add finalizer",
            SyncStep::RemoveFinalizer => "remove finalizer",
            SyncStep::ReadRow => "read row",
            SyncStep::InsertRow => "insert row",
            SyncStep::UpdateRow => "update row",
            SyncStep::MarkRowDeleted => "mark row deleted",
        };
        f.write_str(step)
    }
}

/// A failed reconcile pass. The pass is retried after the requeue delay.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to {step} for {kind} '{key}': {source}")]
    Hub {
        step: SyncStep,
        kind: SyncedKind,
        key: ObjectKey,
        #[source]
        source: HubError,
    },

    #[error("Failed to {step} in table '{kind}' for '{target}': {source}")]
    Database {
        step: SyncStep,
        kind: SyncedKind,
        /// Row id, or `namespace/name` when tombstoning by name.
        target: String,
        #[source]
        source: DatabaseError,
    },

    #[error("{kind} '{key}' has no uid")]
    MissingUid { kind: SyncedKind, key: ObjectKey },

    #[error("Failed to serialize {kind} '{key}': {source}")]
    Serialize {
        kind: SyncedKind,
        key: ObjectKey,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    pub(crate) fn hub(step: SyncStep, kind: SyncedKind, key: &ObjectKey, source: HubError) -> Self {
        SyncError::Hub {
            step,
            kind,
            key: key.clone(),
            source,
        }
    }

    pub(crate) fn database(
        step: SyncStep,
        kind: SyncedKind,
        target: impl Into<String>,
        source: DatabaseError,
    ) -> Self {
        SyncError::Database {
            step,
            kind,
            target: target.into(),
            source,
        }
    }

    /// The step that failed, if the failure came from an external call.
    pub fn step(&self) -> Option<SyncStep> {
        match self {
            SyncError::Hub { step, .. } | SyncError::Database { step, .. } => Some(*step),
            SyncError::MissingUid { .. } | SyncError::Serialize { .. } => None,
        }
    }

    /// Whether the hub rejected a write because the instance changed meanwhile.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SyncError::Hub { source, .. } if source.is_conflict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_step_and_target() {
        let err = SyncError::database(
            SyncStep::InsertRow,
            SyncedKind::Policies,
            "uid-1",
            DatabaseError::InvalidIdentifier("x y".to_string()),
        );
        let message = err.to_string();
        assert!(message.contains("insert row"), "{message}");
        assert!(message.contains("policies"), "{message}");
        assert!(message.contains("uid-1"), "{message}");
        assert_eq!(err.step(), Some(SyncStep::InsertRow));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_hub_error_message() {
        let err = SyncError::hub(
            SyncStep::AddFinalizer,
            SyncedKind::Channels,
            &ObjectKey::namespaced("ns1", "ch1"),
            HubError::MissingName {
                kind: "Channel".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Failed to add finalizer for channels 'ns1/ch1': Instance of kind Channel has no name"
        );
    }
}
