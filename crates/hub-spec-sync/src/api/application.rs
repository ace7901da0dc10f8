//! `app.k8s.io/v1beta1` Application.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Fields;

/// Groups the components that make up one application.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "app.k8s.io",
    version = "v1beta1",
    kind = "Application",
    plural = "applications",
    namespaced,
    status = "Fields",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_kinds: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Value>,

    #[serde(flatten)]
    pub extra: Fields,
}
