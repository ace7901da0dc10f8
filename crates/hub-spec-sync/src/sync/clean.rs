//! Stripping of volatile metadata before an instance is stored or compared.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Annotation written by `kubectl apply`; it duplicates the whole object.
pub const LAST_APPLIED_CONFIG_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Clears the metadata that changes without the desired state changing.
///
/// The uid must be read before calling this, since it is cleared too.
pub fn clean_metadata(meta: &mut ObjectMeta) {
    meta.uid = None;
    meta.resource_version = None;
    meta.managed_fields = None;
    meta.finalizers = None;
    meta.generation = None;
    meta.owner_references = None;

    if let Some(annotations) = meta.annotations.as_mut() {
        annotations.remove(LAST_APPLIED_CONFIG_ANNOTATION);
        if annotations.is_empty() {
            meta.annotations = None;
        }
    }
}
