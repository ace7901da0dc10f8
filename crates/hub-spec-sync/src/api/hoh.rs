//! Hub-of-hubs global configuration (`hub-of-hubs.open-cluster-management.io/v1`).

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::Fields;

/// Namespace holding the one Config instance that is synced.
pub const HOH_SYSTEM_NAMESPACE: &str = "hoh-system";

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "hub-of-hubs.open-cluster-management.io",
    version = "v1",
    kind = "Config",
    plural = "configs",
    namespaced,
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_level: Option<String>,

    #[serde(default)]
    pub enable_local_policies: bool,

    #[serde(flatten)]
    pub extra: Fields,
}
