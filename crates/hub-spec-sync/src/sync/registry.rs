//! The set of syncers started by the manager.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use kube::Client;

use super::controller;
use super::kinds::{
    ApplicationStrategy, ChannelStrategy, ConfigStrategy, ManagedClusterSetBindingStrategy,
    ManagedClusterSetStrategy, PlacementBindingStrategy, PlacementRuleStrategy, PolicyStrategy,
    SecretStrategy, SubscriptionStrategy,
};
use super::reconciler::SpecReconciler;
use super::strategy::SyncStrategy;
use super::SyncedKind;
use crate::config::SyncSettings;
use crate::db::SpecStore;
use crate::hub::{HubApi, KubeHub};

/// Runtime knobs shared by every syncer.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub requeue_after: Duration,
    pub excluded_namespaces: Vec<String>,
    pub compare_policy_templates: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions::from(&SyncSettings::default())
    }
}

impl From<&SyncSettings> for SyncOptions {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            requeue_after: settings.requeue_after(),
            excluded_namespaces: settings.excluded_namespaces.clone(),
            compare_policy_templates: settings.policy.compare_templates,
        }
    }
}

/// A watch loop for one kind, ready to be started.
pub trait Syncer: Send {
    fn kind(&self) -> SyncedKind;

    /// Runs until shutdown.
    fn run(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Binds a strategy's reconciler to the hub watch of its kind.
pub struct KindBinding<S: SyncStrategy> {
    client: Client,
    reconciler: SpecReconciler<S>,
    requeue_after: Duration,
}

impl<S: SyncStrategy> KindBinding<S> {
    pub fn new(client: Client, reconciler: SpecReconciler<S>, requeue_after: Duration) -> Self {
        Self {
            client,
            reconciler,
            requeue_after,
        }
    }
}

impl<S: SyncStrategy> Syncer for KindBinding<S> {
    fn kind(&self) -> SyncedKind {
        S::KIND
    }

    fn run(self: Box<Self>) -> BoxFuture<'static, ()> {
        let KindBinding {
            client,
            reconciler,
            requeue_after,
        } = *self;
        Box::pin(controller::run(client, reconciler, requeue_after))
    }
}

/// Builds one syncer per requested kind, in the given order.
pub fn bindings(
    client: &Client,
    store: Arc<dyn SpecStore>,
    kinds: &[SyncedKind],
    options: &SyncOptions,
) -> Vec<Box<dyn Syncer>> {
    let bind = |kind: SyncedKind| -> Box<dyn Syncer> {
        match kind {
            SyncedKind::Policies => binding(
                client,
                PolicyStrategy::new(options.compare_policy_templates),
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::PlacementBindings => binding(
                client,
                PlacementBindingStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::PlacementRules => binding(
                client,
                PlacementRuleStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::Applications => binding(
                client,
                ApplicationStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::Channels => binding(
                client,
                ChannelStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::Subscriptions => binding(
                client,
                SubscriptionStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::ManagedClusterSets => binding(
                client,
                ManagedClusterSetStrategy,
                KubeHub::cluster(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::ManagedClusterSetBindings => binding(
                client,
                ManagedClusterSetBindingStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::Configs => binding(
                client,
                ConfigStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
            SyncedKind::Secrets => binding(
                client,
                SecretStrategy,
                KubeHub::namespaced(client.clone()),
                store.clone(),
                options,
            ),
        }
    };

    kinds.iter().copied().map(bind).collect()
}

fn binding<S: SyncStrategy>(
    client: &Client,
    strategy: S,
    hub: KubeHub<S::Kind>,
    store: Arc<dyn SpecStore>,
    options: &SyncOptions,
) -> Box<dyn Syncer> {
    let hub: Arc<dyn HubApi<S::Kind>> = Arc::new(hub);
    let reconciler = SpecReconciler::new(strategy, hub, store)
        .with_excluded_namespaces(options.excluded_namespaces.clone());
    Box::new(KindBinding::new(
        client.clone(),
        reconciler,
        options.requeue_after,
    ))
}
