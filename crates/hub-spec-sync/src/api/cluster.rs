//! Cluster set resources from `cluster.open-cluster-management.io/v1beta1`.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Fields;

/// A cluster-scoped group of managed clusters.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "cluster.open-cluster-management.io",
    version = "v1beta1",
    kind = "ManagedClusterSet",
    plural = "managedclustersets",
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterSetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_selector: Option<Value>,

    #[serde(flatten)]
    pub extra: Fields,
}

/// Makes a cluster set usable from one namespace.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "cluster.open-cluster-management.io",
    version = "v1beta1",
    kind = "ManagedClusterSetBinding",
    plural = "managedclustersetbindings",
    namespaced,
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterSetBindingSpec {
    #[serde(default)]
    pub cluster_set: String,

    #[serde(flatten)]
    pub extra: Fields,
}
