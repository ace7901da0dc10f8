//! The hub-of-hubs Config.

use crate::api::hoh::HOH_SYSTEM_NAMESPACE;
use crate::api::Config;
use crate::sync::strategy::{annotations_equal, SyncStrategy};
use crate::sync::SyncedKind;

/// The hub-of-hubs Config. Only the instance in `hoh-system` is synced.
#[derive(Debug, Clone, Default)]
pub struct ConfigStrategy;

impl SyncStrategy for ConfigStrategy {
    type Kind = Config;
    const KIND: SyncedKind = SyncedKind::Configs;

    fn clean_status(&self, instance: &mut Config) {
        instance.status = None;
    }

    fn are_equal(&self, a: &Config, b: &Config) -> bool {
        annotations_equal(&a.metadata, &b.metadata) && a.spec == b.spec
    }

    fn should_process(&self, instance: &Config) -> bool {
        instance.metadata.namespace.as_deref() == Some(HOH_SYSTEM_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ConfigSpec;

    #[test]
    fn test_only_hoh_system_config_processed() {
        let strategy = ConfigStrategy;
        let mut config = Config::new("hub-of-hubs-config", ConfigSpec::default());
        assert!(!strategy.should_process(&config));

        config.metadata.namespace = Some("default".to_string());
        assert!(!strategy.should_process(&config));

        config.metadata.namespace = Some(HOH_SYSTEM_NAMESPACE.to_string());
        assert!(strategy.should_process(&config));
    }

    #[test]
    fn test_config_spec_difference() {
        let strategy = ConfigStrategy;
        let a = Config::new("hub-of-hubs-config", ConfigSpec::default());
        let mut b = a.clone();
        assert!(strategy.are_equal(&a, &b));
        b.spec.aggregation_level = Some("minimal".to_string());
        assert!(!strategy.are_equal(&a, &b));
    }
}
