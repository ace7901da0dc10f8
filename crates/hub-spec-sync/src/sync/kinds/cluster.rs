//! Managed cluster sets and their bindings.

use crate::api::{ManagedClusterSet, ManagedClusterSetBinding};
use crate::sync::strategy::{annotations_equal, SyncStrategy};
use crate::sync::SyncedKind;

/// Managed cluster sets (cluster-scoped). Equality looks at name and spec
/// only; annotations are not compared.
#[derive(Debug, Clone, Default)]
pub struct ManagedClusterSetStrategy;

impl SyncStrategy for ManagedClusterSetStrategy {
    type Kind = ManagedClusterSet;
    const KIND: SyncedKind = SyncedKind::ManagedClusterSets;

    fn clean_status(&self, instance: &mut ManagedClusterSet) {
        instance.status = None;
    }

    fn are_equal(&self, a: &ManagedClusterSet, b: &ManagedClusterSet) -> bool {
        a.metadata.name == b.metadata.name && a.spec == b.spec
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManagedClusterSetBindingStrategy;

impl SyncStrategy for ManagedClusterSetBindingStrategy {
    type Kind = ManagedClusterSetBinding;
    const KIND: SyncedKind = SyncedKind::ManagedClusterSetBindings;

    fn clean_status(&self, instance: &mut ManagedClusterSetBinding) {
        instance.status = None;
    }

    fn are_equal(&self, a: &ManagedClusterSetBinding, b: &ManagedClusterSetBinding) -> bool {
        annotations_equal(&a.metadata, &b.metadata) && a.spec == b.spec
    }
}
