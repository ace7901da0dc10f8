//! Application lifecycle resources from `apps.open-cluster-management.io/v1`.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Fields;

// ============================================================================
// PlacementRule
// ============================================================================

/// Selects the managed clusters a policy or subscription is placed on.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "apps.open-cluster-management.io",
    version = "v1",
    kind = "PlacementRule",
    plural = "placementrules",
    namespaced,
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_selector: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler_name: Option<String>,

    #[serde(flatten)]
    pub extra: Fields,
}

// ============================================================================
// Channel
// ============================================================================

/// A source repository (git, helm, object store, namespace) for subscriptions.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "apps.open-cluster-management.io",
    version = "v1",
    kind = "Channel",
    plural = "channels",
    namespaced,
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSpec {
    #[serde(rename = "type", default)]
    pub channel_type: String,

    #[serde(default)]
    pub pathname: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<Value>,

    #[serde(flatten)]
    pub extra: Fields,
}

// ============================================================================
// Subscription
// ============================================================================

/// Subscribes managed clusters to resources published through a channel.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "apps.open-cluster-management.io",
    version = "v1",
    kind = "Subscription",
    plural = "subscriptions",
    namespaced,
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSpec {
    #[serde(default)]
    pub channel: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_overrides: Vec<Value>,

    #[serde(flatten)]
    pub extra: Fields,
}
