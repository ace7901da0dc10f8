//! The per-kind behavior plugged into the generic reconciler.

use std::collections::BTreeMap;
use std::fmt::Debug;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::SyncedKind;

/// How one resource kind is cleaned, compared, and filtered.
///
/// Hub reads and stored payloads are both decoded into [`SyncStrategy::Kind`],
/// so a strategy can only ever be handed instances of its own kind.
pub trait SyncStrategy: Send + Sync + 'static {
    type Kind: Resource<DynamicType = ()>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Table, finalizer and naming of the kind.
    const KIND: SyncedKind;

    /// Strips status fields that must not reach the stored payload.
    fn clean_status(&self, instance: &mut Self::Kind);

    /// Whether two cleaned instances carry the same desired state.
    fn are_equal(&self, a: &Self::Kind, b: &Self::Kind) -> bool;

    /// Whether the instance should be synced at all.
    fn should_process(&self, _instance: &Self::Kind) -> bool {
        true
    }
}

/// Compares annotations, treating a missing map and an empty map as equal.
pub fn annotations_equal(a: &ObjectMeta, b: &ObjectMeta) -> bool {
    fn non_empty(meta: &ObjectMeta) -> Option<&BTreeMap<String, String>> {
        meta.annotations.as_ref().filter(|a| !a.is_empty())
    }
    non_empty(a) == non_empty(b)
}

/// Whether the instance carries `annotation`, whatever its value.
pub fn has_annotation(meta: &ObjectMeta, annotation: &str) -> bool {
    meta.annotations
        .as_ref()
        .is_some_and(|annotations| annotations.contains_key(annotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(annotations: Option<&[(&str, &str)]>) -> ObjectMeta {
        ObjectMeta {
            annotations: annotations.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }),
            ..ObjectMeta::default()
        }
    }

    #[test]
    fn test_annotations_equal_treats_empty_as_missing() {
        assert!(annotations_equal(&meta(None), &meta(Some(&[]))));
        assert!(annotations_equal(
            &meta(Some(&[("a", "1")])),
            &meta(Some(&[("a", "1")]))
        ));
        assert!(!annotations_equal(&meta(None), &meta(Some(&[("a", "1")]))));
        assert!(!annotations_equal(
            &meta(Some(&[("a", "1")])),
            &meta(Some(&[("a", "2")]))
        ));
    }

    #[test]
    fn test_has_annotation() {
        assert!(has_annotation(&meta(Some(&[("a", "")])), "a"));
        assert!(!has_annotation(&meta(Some(&[("b", "1")])), "a"));
        assert!(!has_annotation(&meta(None), "a"));
    }
}
