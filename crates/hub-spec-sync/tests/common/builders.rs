//! Builders for hub instances used across the reconcile tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::Utc;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ManagedFieldsEntry, Time};
use kube::Resource;
use serde_json::json;

use hub_spec_sync::api::{ManagedClusterSet, ManagedClusterSetSpec, Policy, PolicySpec, PolicyStatus};
use hub_spec_sync::sync::LAST_APPLIED_CONFIG_ANNOTATION;

/// Builder for `Policy` instances as the hub would return them.
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    /// A live policy with a uid, volatile metadata, and a status.
    pub fn new(namespace: &str, name: &str, uid: &str) -> Self {
        let mut policy = Policy::new(
            name,
            PolicySpec {
                remediation_action: Some("inform".to_string()),
                policy_templates: vec![json!({
                    "objectDefinition": {
                        "apiVersion": "policy.open-cluster-management.io/v1",
                        "kind": "ConfigurationPolicy",
                        "metadata": { "name": format!("{}-config", name) }
                    }
                })],
                ..PolicySpec::default()
            },
        );
        let meta = policy.meta_mut();
        meta.namespace = Some(namespace.to_string());
        meta.uid = Some(uid.to_string());
        meta.resource_version = Some("1".to_string());
        meta.generation = Some(1);
        meta.managed_fields = Some(vec![ManagedFieldsEntry {
            manager: Some("kubectl".to_string()),
            ..ManagedFieldsEntry::default()
        }]);
        meta.annotations = Some(BTreeMap::from([(
            LAST_APPLIED_CONFIG_ANNOTATION.to_string(),
            "{}".to_string(),
        )]));
        policy.status = Some(PolicyStatus {
            compliant: Some("Compliant".to_string()),
            ..PolicyStatus::default()
        });
        Self { policy }
    }

    pub fn remediation(mut self, action: &str) -> Self {
        self.policy.spec.remediation_action = Some(action.to_string());
        self
    }

    pub fn annotation(mut self, key: &str, value: &str) -> Self {
        self.policy
            .metadata
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn finalizer(mut self, finalizer: &str) -> Self {
        self.policy
            .metadata
            .finalizers
            .get_or_insert_with(Vec::new)
            .push(finalizer.to_string());
        self
    }

    pub fn terminating(mut self) -> Self {
        self.policy.metadata.deletion_timestamp = Some(now());
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}

/// Timestamp for marking an instance as being deleted.
pub fn now() -> Time {
    Time(Utc::now())
}

/// A cluster-scoped managed cluster set with a uid.
pub fn cluster_set(name: &str, uid: &str) -> ManagedClusterSet {
    let mut set = ManagedClusterSet::new(name, ManagedClusterSetSpec::default());
    set.metadata.uid = Some(uid.to_string());
    set
}
