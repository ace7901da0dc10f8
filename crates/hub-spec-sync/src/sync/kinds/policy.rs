//! Governance kinds: policies and their placement bindings.

use crate::api::{PlacementBinding, Policy, PolicySpec};
use crate::sync::strategy::{annotations_equal, has_annotation, SyncStrategy};
use crate::sync::SyncedKind;

/// Marks a policy that only applies to the hub itself.
pub const LOCAL_POLICY_ANNOTATION: &str = "hub-of-hubs.open-cluster-management.io/local-policy";

/// Policies. Hub-local policies are not synced.
#[derive(Debug, Clone, Default)]
pub struct PolicyStrategy {
    compare_templates: bool,
}

impl PolicyStrategy {
    /// With `compare_templates` off, a change confined to
    /// `spec.policyTemplates` does not rewrite the stored row.
    pub fn new(compare_templates: bool) -> Self {
        Self { compare_templates }
    }

    fn comparable_spec(&self, spec: &PolicySpec) -> PolicySpec {
        if self.compare_templates {
            spec.clone()
        } else {
            PolicySpec {
                policy_templates: Vec::new(),
                ..spec.clone()
            }
        }
    }
}

impl SyncStrategy for PolicyStrategy {
    type Kind = Policy;
    const KIND: SyncedKind = SyncedKind::Policies;

    fn clean_status(&self, instance: &mut Policy) {
        instance.status = None;
    }

    fn are_equal(&self, a: &Policy, b: &Policy) -> bool {
        annotations_equal(&a.metadata, &b.metadata)
            && self.comparable_spec(&a.spec) == self.comparable_spec(&b.spec)
    }

    fn should_process(&self, instance: &Policy) -> bool {
        !has_annotation(&instance.metadata, LOCAL_POLICY_ANNOTATION)
    }
}

/// Placement bindings. Equal when annotations, placement, subjects and the
/// remaining top-level fields match.
#[derive(Debug, Clone, Default)]
pub struct PlacementBindingStrategy;

impl SyncStrategy for PlacementBindingStrategy {
    type Kind = PlacementBinding;
    const KIND: SyncedKind = SyncedKind::PlacementBindings;

    fn clean_status(&self, instance: &mut PlacementBinding) {
        instance.status = None;
    }

    fn are_equal(&self, a: &PlacementBinding, b: &PlacementBinding) -> bool {
        annotations_equal(&a.metadata, &b.metadata)
            && a.placement_ref == b.placement_ref
            && a.subjects == b.subjects
            && a.extra == b.extra
    }
}
