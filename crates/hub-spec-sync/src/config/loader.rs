use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

use crate::config::schema::{Config, DatabaseSettings};
use crate::error::ConfigError;

const SSL_MODES: &[&str] = &[
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

/// Loads the config file at `path`, or the defaults when no file is given,
/// then applies `DB_*` overrides looked up through `env` and validates.
pub fn load_config<P, F>(path: Option<P>, env: F) -> Result<Config, ConfigError>
where
    P: AsRef<Path>,
    F: Fn(&str) -> Option<String>,
{
    let content = match path {
        Some(path) => {
            let path = path.as_ref();
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?
        }
        None => String::new(),
    };

    load_config_with_env(&content, env)
}

/// Parses a config document, applies overrides looked up through `env`,
/// and validates the result.
pub fn load_config_with_env<F>(content: &str, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(content)?
    };

    apply_env_overrides(&mut config.database, env)?;

    validate_config(&config)?;

    Ok(config)
}

/// Fills database settings left empty by the file from `DB_*` variables.
///
/// `DB_PORT` replaces the port whenever it is set, since the file always
/// carries a port (5432 by default).
fn apply_env_overrides<F>(database: &mut DatabaseSettings, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let fill = |field: &mut String, name: &str| {
        if field.is_empty() {
            if let Some(value) = env(name).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    };

    fill(&mut database.host, "DB_HOST");
    fill(&mut database.name, "DB_NAME");
    fill(&mut database.user, "DB_USER");

    if let Some(port) = env("DB_PORT").filter(|v| !v.is_empty()) {
        database.port = port.parse().map_err(|e| ConfigError::InvalidEnv {
            name: "DB_PORT".to_string(),
            reason: format!("{}", e),
        })?;
    }

    if !database.has_password_source() {
        database.password = env("DB_PASSWORD").filter(|v| !v.is_empty());
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let database = &config.database;
    for (field, value) in [
        ("database.host", &database.host),
        ("database.name", &database.name),
        ("database.user", &database.user),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("{} must not be empty", field),
            });
        }
    }

    if database.port == 0 {
        return Err(ConfigError::Validation {
            message: "database.port must be greater than 0".to_string(),
        });
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation {
            message: "database.maxConnections must be greater than 0".to_string(),
        });
    }

    if !SSL_MODES.contains(&database.ssl_mode.as_str()) {
        return Err(ConfigError::Validation {
            message: format!(
                "Unsupported database.sslMode '{}' (expected one of: {})",
                database.ssl_mode,
                SSL_MODES.join(", ")
            ),
        });
    }

    if !database.has_password_source() {
        warn!("No database password configured; relying on password-less authentication");
    }

    let sync = &config.sync;
    if sync.requeue_after_secs == 0 {
        return Err(ConfigError::Validation {
            message: "sync.requeueAfterSecs must be greater than 0".to_string(),
        });
    }

    let kinds = sync.synced_kinds()?;
    if kinds.is_empty() {
        return Err(ConfigError::Validation {
            message: "sync.kinds must name at least one kind".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for kind in &kinds {
        if !seen.insert(kind) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate kind in sync.kinds: {}", kind),
            });
        }
    }

    Ok(())
}
