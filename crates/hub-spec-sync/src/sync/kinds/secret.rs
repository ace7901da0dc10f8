//! Annotated Secrets.

use k8s_openapi::api::core::v1::Secret;

use crate::sync::strategy::{has_annotation, SyncStrategy};
use crate::sync::SyncedKind;

/// Marks a hub Secret that is mirrored to the spec database.
pub const SECRET_ANNOTATION: &str = "hub-of-hubs.open-cluster-management.io/secret";

/// Annotated Secrets. Only `data` and `stringData` are compared, since
/// those are the only fields consumers read.
#[derive(Debug, Clone, Default)]
pub struct SecretStrategy;

impl SyncStrategy for SecretStrategy {
    type Kind = Secret;
    const KIND: SyncedKind = SyncedKind::Secrets;

    // Secrets have no status.
    fn clean_status(&self, _instance: &mut Secret) {}

    fn are_equal(&self, a: &Secret, b: &Secret) -> bool {
        a.data == b.data && a.string_data == b.string_data
    }

    fn should_process(&self, instance: &Secret) -> bool {
        has_annotation(&instance.metadata, SECRET_ANNOTATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    fn secret(annotated: bool, password: &[u8]) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some("pull-secret".to_string()),
                namespace: Some("ns1".to_string()),
                annotations: annotated
                    .then(|| BTreeMap::from([(SECRET_ANNOTATION.to_string(), String::new())])),
                ..ObjectMeta::default()
            },
            data: Some(BTreeMap::from([(
                "password".to_string(),
                ByteString(password.to_vec()),
            )])),
            ..Secret::default()
        }
    }

    #[test]
    fn test_only_annotated_secrets_processed() {
        let strategy = SecretStrategy;
        assert!(strategy.should_process(&secret(true, b"a")));
        assert!(!strategy.should_process(&secret(false, b"a")));
    }

    #[test]
    fn test_secret_equality_ignores_metadata() {
        let strategy = SecretStrategy;
        assert!(strategy.are_equal(&secret(true, b"a"), &secret(false, b"a")));
        assert!(!strategy.are_equal(&secret(true, b"a"), &secret(true, b"b")));

        let mut with_string_data = secret(true, b"a");
        with_string_data.string_data =
            Some(BTreeMap::from([("user".to_string(), "admin".to_string())]));
        assert!(!strategy.are_equal(&secret(true, b"a"), &with_string_data));
    }
}
