//! Strategies for the synced kinds.
//!
//! Unless noted otherwise a kind is equal when its annotations and spec are
//! equal, and its status is dropped before storing.

pub mod application;
pub mod apps;
pub mod cluster;
pub mod hoh;
pub mod policy;
pub mod secret;

pub use application::{ApplicationStrategy, LOCAL_RESOURCE_ANNOTATION};
pub use apps::{ChannelStrategy, PlacementRuleStrategy, SubscriptionStrategy};
pub use cluster::{ManagedClusterSetBindingStrategy, ManagedClusterSetStrategy};
pub use hoh::ConfigStrategy;
pub use policy::{PlacementBindingStrategy, PolicyStrategy, LOCAL_POLICY_ANNOTATION};
pub use secret::{SecretStrategy, SECRET_ANNOTATION};
