//! Governance resources from `policy.open-cluster-management.io/v1`.

use std::borrow::Cow;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::NamespaceResourceScope;
use kube::core::TypeMeta;
use kube::{CustomResource, Resource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Fields;

const GROUP: &str = "policy.open-cluster-management.io";
const VERSION: &str = "v1";

// ============================================================================
// Policy
// ============================================================================

/// Desired state of a governance policy.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "policy.open-cluster-management.io",
    version = "v1",
    kind = "Policy",
    plural = "policies",
    namespaced,
    status = "PolicyStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    #[serde(default)]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_action: Option<String>,

    /// Embedded templates propagated to managed clusters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_templates: Vec<Value>,

    #[serde(flatten)]
    pub extra: Fields,
}

/// Observed compliance, written by the policy propagator on the hub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliant: Option<String>,

    #[serde(flatten)]
    pub extra: Fields,
}

// ============================================================================
// PlacementBinding
// ============================================================================

/// Reference to a placement or a bound subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSubject {
    #[serde(default)]
    pub api_group: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// Binds policies to a placement.
///
/// Unlike most custom resources the binding keeps `placementRef` and
/// `subjects` at the top level instead of under `spec`, so the
/// [`Resource`] impl is written by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementBinding {
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub placement_ref: PlacementSubject,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<PlacementSubject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,

    /// Top-level fields not modelled above, such as `subFilter` and
    /// `bindingOverrides`.
    #[serde(flatten)]
    pub extra: Fields,
}

impl PlacementBinding {
    /// Creates a binding with type information filled in.
    pub fn new(name: &str, placement_ref: PlacementSubject) -> Self {
        Self {
            types: Some(TypeMeta {
                api_version: format!("{}/{}", GROUP, VERSION),
                kind: "PlacementBinding".to_string(),
            }),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..ObjectMeta::default()
            },
            placement_ref,
            subjects: Vec::new(),
            status: None,
            extra: Fields::new(),
        }
    }
}

impl Resource for PlacementBinding {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "PlacementBinding".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        GROUP.into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        VERSION.into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "placementbindings".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
