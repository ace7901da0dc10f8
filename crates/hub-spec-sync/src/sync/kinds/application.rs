//! Applications.

use crate::api::Application;
use crate::sync::strategy::{annotations_equal, has_annotation, SyncStrategy};
use crate::sync::SyncedKind;

/// Marks a resource that stays on the hub it was created on.
pub const LOCAL_RESOURCE_ANNOTATION: &str = "hub-of-hubs.open-cluster-management.io/local-resource";

/// Applications. Hub-local applications are not synced.
#[derive(Debug, Clone, Default)]
pub struct ApplicationStrategy;

impl SyncStrategy for ApplicationStrategy {
    type Kind = Application;
    const KIND: SyncedKind = SyncedKind::Applications;

    fn clean_status(&self, instance: &mut Application) {
        instance.status = None;
    }

    fn are_equal(&self, a: &Application, b: &Application) -> bool {
        annotations_equal(&a.metadata, &b.metadata) && a.spec == b.spec
    }

    fn should_process(&self, instance: &Application) -> bool {
        !has_annotation(&instance.metadata, LOCAL_RESOURCE_ANNOTATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApplicationSpec;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn application() -> Application {
        Application::new(
            "app1",
            ApplicationSpec {
                selector: Some(json!({ "matchLabels": { "app": "demo" } })),
                ..ApplicationSpec::default()
            },
        )
    }

    #[test]
    fn test_application_equality() {
        let strategy = ApplicationStrategy;
        let a = application();
        let mut b = a.clone();
        b.status = Some(BTreeMap::from([("components".to_string(), json!(3))]));
        assert!(strategy.are_equal(&a, &b));

        b.spec.selector = None;
        assert!(!strategy.are_equal(&a, &b));
    }

    #[test]
    fn test_local_application_is_not_processed() {
        let strategy = ApplicationStrategy;
        let mut app = application();
        assert!(strategy.should_process(&app));

        app.metadata.annotations = Some(BTreeMap::from([(
            LOCAL_RESOURCE_ANNOTATION.to_string(),
            String::new(),
        )]));
        assert!(!strategy.should_process(&app));
    }
}
