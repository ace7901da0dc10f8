use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::secrets::{self, SecretError};
use crate::sync::SyncedKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub hub: HubSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How to reach the hub cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSettings {
    /// Path to a kubeconfig. When unset the client is inferred from the
    /// in-cluster service account or `KUBECONFIG`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env_var: Option<String>,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_port() -> u16 {
    5432
}

fn default_ssl_mode() -> String {
    "verify-full".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            name: String::new(),
            user: String::new(),
            password: None,
            password_file: None,
            password_env_var: None,
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseSettings {
    /// Resolves the password from the configured sources, if any.
    pub fn resolve_password(&self) -> Result<Option<SecretString>, SecretError> {
        secrets::resolve_secret_optional(
            self.password.as_deref(),
            self.password_file.as_deref(),
            self.password_env_var.as_deref(),
        )
    }

    /// Whether any password source is configured.
    pub fn has_password_source(&self) -> bool {
        secrets::has_secret_source(
            self.password.as_deref(),
            self.password_file.as_deref(),
            self.password_env_var.as_deref(),
        )
    }
}

/// Which kinds are synced and how the watch loops behave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Kinds to sync, by table name or Kubernetes kind.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<String>,
    #[serde(default = "default_requeue_after_secs")]
    pub requeue_after_secs: u64,
    /// Namespaces whose instances are never synced, whatever their kind.
    #[serde(default = "default_excluded_namespaces")]
    pub excluded_namespaces: Vec<String>,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
    #[serde(default)]
    pub policy: PolicySettings,
}

fn default_kinds() -> Vec<String> {
    SyncedKind::all()
        .iter()
        .map(|kind| kind.table().to_string())
        .collect()
}

fn default_requeue_after_secs() -> u64 {
    5
}

fn default_excluded_namespaces() -> Vec<String> {
    vec!["open-cluster-management".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
            requeue_after_secs: default_requeue_after_secs(),
            excluded_namespaces: default_excluded_namespaces(),
            run_migrations: true,
            policy: PolicySettings::default(),
        }
    }
}

impl SyncSettings {
    /// Parses the configured kind names.
    pub fn synced_kinds(&self) -> Result<Vec<SyncedKind>, ConfigError> {
        self.kinds
            .iter()
            .map(|name| {
                SyncedKind::from_str(name).map_err(|message| ConfigError::Validation { message })
            })
            .collect()
    }

    pub fn requeue_after(&self) -> Duration {
        Duration::from_secs(self.requeue_after_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySettings {
    /// Compare `spec.policyTemplates` when deciding whether a stored policy
    /// is stale. Off by default: template edits alone do not rewrite the row.
    #[serde(default)]
    pub compare_templates: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}
