//! Typed views of the hub resources whose spec is mirrored.
//!
//! Only the top-level spec fields the syncer reasons about are typed; every
//! other field is carried through `extra` so the stored payload keeps the
//! full desired state.

pub mod application;
pub mod apps;
pub mod cluster;
pub mod hoh;
pub mod policy;

pub use application::{Application, ApplicationSpec};
pub use apps::{Channel, ChannelSpec, PlacementRule, PlacementRuleSpec, Subscription, SubscriptionSpec};
pub use cluster::{
    ManagedClusterSet, ManagedClusterSetBinding, ManagedClusterSetBindingSpec, ManagedClusterSetSpec,
};
pub use hoh::{Config, ConfigSpec};
pub use k8s_openapi::api::core::v1::Secret;
pub use policy::{PlacementBinding, PlacementSubject, Policy, PolicySpec, PolicyStatus};

use serde_json::Value;
use std::collections::BTreeMap;

/// Untyped remainder of a spec or status object.
pub type Fields = BTreeMap<String, Value>;
