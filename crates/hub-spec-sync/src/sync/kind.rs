//! The fixed set of resource kinds mirrored into the spec database.

use serde::{Deserialize, Serialize};

/// Domain used to build every finalizer name owned by the syncer.
pub const FINALIZER_DOMAIN: &str = "hub-of-hubs.open-cluster-management.io";

/// A resource kind whose spec is mirrored into its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncedKind {
    Policies,
    PlacementBindings,
    PlacementRules,
    Applications,
    Channels,
    Subscriptions,
    ManagedClusterSets,
    ManagedClusterSetBindings,
    Configs,
    Secrets,
}

impl SyncedKind {
    /// Returns all synced kinds, in registration order.
    pub fn all() -> &'static [SyncedKind] {
        &[
            SyncedKind::Policies,
            SyncedKind::PlacementBindings,
            SyncedKind::PlacementRules,
            SyncedKind::Applications,
            SyncedKind::Channels,
            SyncedKind::Subscriptions,
            SyncedKind::ManagedClusterSets,
            SyncedKind::ManagedClusterSetBindings,
            SyncedKind::Configs,
            SyncedKind::Secrets,
        ]
    }

    /// Returns the table (inside the `spec` schema) holding rows of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            SyncedKind::Policies => "policies",
            SyncedKind::PlacementBindings => "placementbindings",
            SyncedKind::PlacementRules => "placementrules",
            SyncedKind::Applications => "applications",
            SyncedKind::Channels => "channels",
            SyncedKind::Subscriptions => "subscriptions",
            SyncedKind::ManagedClusterSets => "managedclustersets",
            SyncedKind::ManagedClusterSetBindings => "managedclustersetbindings",
            SyncedKind::Configs => "configs",
            SyncedKind::Secrets => "secrets",
        }
    }

    /// Returns the Kubernetes kind name of the watched resource.
    pub fn resource_kind(&self) -> &'static str {
        match self {
            SyncedKind::Policies => "Policy",
            SyncedKind::PlacementBindings => "PlacementBinding",
            SyncedKind::PlacementRules => "PlacementRule",
            SyncedKind::Applications => "Application",
            SyncedKind::Channels => "Channel",
            SyncedKind::Subscriptions => "Subscription",
            SyncedKind::ManagedClusterSets => "ManagedClusterSet",
            SyncedKind::ManagedClusterSetBindings => "ManagedClusterSetBinding",
            SyncedKind::Configs => "Config",
            SyncedKind::Secrets => "Secret",
        }
    }

    /// Returns the finalizer the syncer places on instances of this kind.
    pub fn finalizer(&self) -> String {
        format!("{}/{}", FINALIZER_DOMAIN, self.finalizer_suffix())
    }

    /// Suffixes follow `<kind>-cleanup` and are kept identical to the ones
    /// already present on hub instances, which is why a few kinds use a
    /// plural or prefixed form.
    fn finalizer_suffix(&self) -> &'static str {
        match self {
            SyncedKind::Policies => "policy-cleanup",
            SyncedKind::PlacementBindings => "placementbinding-cleanup",
            SyncedKind::PlacementRules => "placementrule-cleanup",
            SyncedKind::Applications => "application-cleanup",
            SyncedKind::Channels => "channel-cleanup",
            SyncedKind::Subscriptions => "subscription-cleanup",
            SyncedKind::ManagedClusterSets => "managedclustersets-cleanup",
            SyncedKind::ManagedClusterSetBindings => "managedclustersetbindings-cleanup",
            SyncedKind::Configs => "hoh-config-cleanup",
            SyncedKind::Secrets => "secret-cleanup",
        }
    }

    /// Whether instances of this kind live in a namespace.
    pub fn is_namespaced(&self) -> bool {
        !matches!(self, SyncedKind::ManagedClusterSets)
    }
}

impl std::fmt::Display for SyncedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

impl std::str::FromStr for SyncedKind {
    type Err = String;

    /// Accepts either the table name or the Kubernetes kind, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        SyncedKind::all()
            .iter()
            .copied()
            .find(|kind| kind.table() == lower || kind.resource_kind().to_lowercase() == lower)
            .ok_or_else(|| format!("Unknown synced kind: {}", s))
    }
}
