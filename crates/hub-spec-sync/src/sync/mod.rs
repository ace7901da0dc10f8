//! Spec synchronization: the generic reconciler, the per-kind strategies,
//! and the watch loops that drive them.

pub mod clean;
pub mod controller;
pub mod error;
pub mod kind;
pub mod kinds;
pub mod reconciler;
pub mod registry;
pub mod strategy;

pub use clean::{clean_metadata, LAST_APPLIED_CONFIG_ANNOTATION};
pub use error::{SyncError, SyncStep};
pub use kind::{SyncedKind, FINALIZER_DOMAIN};
pub use reconciler::{ReconcileOutcome, SpecReconciler};
pub use registry::{bindings, KindBinding, SyncOptions, Syncer};
pub use strategy::{annotations_equal, has_annotation, SyncStrategy};
