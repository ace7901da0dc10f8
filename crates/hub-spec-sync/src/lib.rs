pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod hub;
pub mod secrets;
pub mod sync;

pub use config::{load_config, Config, DatabaseSettings, SyncSettings};
pub use db::{DatabaseError, PostgresSpecStore, SpecStore};
pub use error::ConfigError;
pub use hub::{HubApi, HubError, KubeHub, ObjectKey};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use sync::{
    bindings, ReconcileOutcome, SpecReconciler, SyncError, SyncOptions, SyncStrategy, SyncedKind,
    Syncer,
};
