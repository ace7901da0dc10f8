//! Drives a [`SpecReconciler`] from a `kube::runtime::Controller` watch.
//!
//! The controller only triggers on applied objects. An instance that is
//! gone by the time its trigger runs surfaces as `ObjectNotFound`; those
//! keys are handed to a separate retry loop so a failed tombstone is retried
//! instead of dropped, and the watch stream never waits on the database.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{future, stream, StreamExt};
use kube::runtime::controller::{Action, Controller, Error as ControllerError};
use kube::runtime::watcher;
use kube::{Api, Client};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::error::SyncError;
use super::reconciler::SpecReconciler;
use super::strategy::SyncStrategy;
use crate::hub::ObjectKey;

struct Context<S: SyncStrategy> {
    reconciler: SpecReconciler<S>,
    requeue_after: Duration,
}

/// Watches every instance of `S::Kind` cluster-wide and reconciles each
/// change until a termination signal arrives.
pub async fn run<S: SyncStrategy>(
    client: Client,
    reconciler: SpecReconciler<S>,
    requeue_after: Duration,
) {
    let kind = S::KIND;
    let ctx = Arc::new(Context {
        reconciler,
        requeue_after,
    });
    let (vanished_tx, vanished_rx) = mpsc::unbounded_channel::<ObjectKey>();

    info!(kind = %kind, "Starting spec syncer");

    let watch = Controller::new(Api::<S::Kind>::all(client), watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile::<S>, error_policy::<S>, ctx.clone())
        .for_each(move |result| {
            match result {
                Ok((object, _)) => {
                    debug!(kind = %kind, object = %object, "Reconciled");
                }
                // Failures were already logged by the error policy.
                Err(ControllerError::ReconcilerFailed(..)) => {}
                Err(ControllerError::ObjectNotFound(object)) => {
                    let key = ObjectKey {
                        namespace: object.namespace.clone(),
                        name: object.name.clone(),
                    };
                    debug!(kind = %kind, key = %key, "Instance left the cache, queueing tombstone");
                    if vanished_tx.send(key).is_err() {
                        warn!(kind = %kind, "Vanished instance queue is closed");
                    }
                }
                Err(e) => {
                    warn!(kind = %kind, error = %e, "Watch error");
                }
            }
            future::ready(())
        });

    let vanished = stream::unfold(vanished_rx, |mut rx| async move {
        rx.recv().await.map(|key| (key, rx))
    })
    .for_each_concurrent(None, |key| {
        let ctx = ctx.clone();
        async move {
            let outcome = ctx
                .reconciler
                .reconcile_until_settled(&key, ctx.requeue_after)
                .await;
            debug!(kind = %kind, key = %key, outcome = %outcome, "Vanished instance settled");
        }
    });

    // Pending retries are abandoned once the watch shuts down.
    tokio::select! {
        _ = watch => {}
        _ = vanished => {}
    }

    info!(kind = %kind, "Spec syncer stopped");
}

async fn reconcile<S: SyncStrategy>(
    instance: Arc<S::Kind>,
    ctx: Arc<Context<S>>,
) -> Result<Action, SyncError> {
    let key = ObjectKey::from_resource(instance.as_ref());
    let outcome = ctx.reconciler.reconcile(&key).await?;
    debug!(kind = %S::KIND, key = %key, outcome = %outcome, "Reconcile pass finished");
    Ok(Action::await_change())
}

fn error_policy<S: SyncStrategy>(
    instance: Arc<S::Kind>,
    error: &SyncError,
    ctx: Arc<Context<S>>,
) -> Action {
    let key = ObjectKey::from_resource(instance.as_ref());
    if error.is_conflict() {
        debug!(kind = %S::KIND, key = %key, error = %error, "Instance changed during reconcile, retrying");
    } else {
        warn!(
            kind = %S::KIND,
            key = %key,
            error = %error,
            retry_in_secs = ctx.requeue_after.as_secs(),
            "Reconcile failed"
        );
    }
    Action::requeue(ctx.requeue_after)
}
