//! Application lifecycle kinds: placement rules, channels and subscriptions.

use crate::api::{Channel, PlacementRule, Subscription};
use crate::sync::strategy::{annotations_equal, SyncStrategy};
use crate::sync::SyncedKind;

/// API group suffix of the owners whose subscriptions are synced. The first
/// DNS label of the owner's group is ignored.
const SUBSCRIPTION_OWNER_GROUP_VERSION: &str = "open-cluster-management.io/v1";

#[derive(Debug, Clone, Default)]
pub struct PlacementRuleStrategy;

impl SyncStrategy for PlacementRuleStrategy {
    type Kind = PlacementRule;
    const KIND: SyncedKind = SyncedKind::PlacementRules;

    fn clean_status(&self, instance: &mut PlacementRule) {
        instance.status = None;
    }

    fn are_equal(&self, a: &PlacementRule, b: &PlacementRule) -> bool {
        annotations_equal(&a.metadata, &b.metadata) && a.spec == b.spec
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChannelStrategy;

impl SyncStrategy for ChannelStrategy {
    type Kind = Channel;
    const KIND: SyncedKind = SyncedKind::Channels;

    fn clean_status(&self, instance: &mut Channel) {
        instance.status = None;
    }

    fn are_equal(&self, a: &Channel, b: &Channel) -> bool {
        annotations_equal(&a.metadata, &b.metadata) && a.spec == b.spec
    }
}

/// Subscriptions created on behalf of an open-cluster-management object,
/// as named by the first owner reference.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStrategy;

impl SyncStrategy for SubscriptionStrategy {
    type Kind = Subscription;
    const KIND: SyncedKind = SyncedKind::Subscriptions;

    fn clean_status(&self, instance: &mut Subscription) {
        instance.status = None;
    }

    fn are_equal(&self, a: &Subscription, b: &Subscription) -> bool {
        annotations_equal(&a.metadata, &b.metadata) && a.spec == b.spec
    }

    fn should_process(&self, instance: &Subscription) -> bool {
        instance
            .metadata
            .owner_references
            .as_deref()
            .and_then(<[_]>::first)
            .and_then(|owner| owner.api_version.split_once('.'))
            .is_some_and(|(_, group_version)| group_version == SUBSCRIPTION_OWNER_GROUP_VERSION)
    }
}
