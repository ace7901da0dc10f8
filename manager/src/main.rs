//! Spec syncer manager.
//!
//! Loads the configuration, connects to the hub cluster and the spec
//! database, and runs one watch loop per configured kind until SIGINT or
//! SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::future::join_all;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use hub_spec_sync::config::{load_config, Config, LoggingSettings};
use hub_spec_sync::db::{self, PostgresSpecStore, SpecStore};
use hub_spec_sync::secrets::expand_home;
use hub_spec_sync::sync::{bindings, SyncOptions};

#[derive(Parser, Debug)]
#[command(name = "hub-spec-sync-manager", version, about)]
struct Cli {
    /// YAML configuration file. Without it, settings come from defaults and
    /// the DB_* environment variables.
    #[arg(long, env = "HUB_SPEC_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Kubeconfig of the hub cluster (overrides `hub.kubeconfig`).
    #[arg(long)]
    hub_kubeconfig: Option<String>,

    /// Database user (overrides `database.user` and DB_USER).
    #[arg(long)]
    database_user_name: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Print the tables of the configured kinds and exit.
    #[arg(long)]
    print_tables: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    init_logging(&config.logging, cli.log_json || config.logging.json)?;

    let kinds = config.sync.synced_kinds()?;

    if cli.print_tables {
        for kind in &kinds {
            println!("{}.{}", db::SPEC_SCHEMA, kind.table());
        }
        return Ok(());
    }

    let client = hub_client(cli.hub_kubeconfig.as_deref().or(config.hub.kubeconfig.as_deref()))
        .await
        .context("Failed to create hub client")?;

    let conn = db::connect(&config.database)
        .await
        .context("Failed to connect to the spec database")?;
    if config.sync.run_migrations {
        db::migrate(&conn).await?;
    }
    let store: Arc<dyn SpecStore> = Arc::new(PostgresSpecStore::new(conn));

    let syncers = bindings(&client, store, &kinds, &SyncOptions::from(&config.sync));
    info!(
        kinds = ?syncers.iter().map(|s| s.kind().table()).collect::<Vec<_>>(),
        "Starting spec syncers"
    );

    join_all(syncers.into_iter().map(|syncer| syncer.run())).await;

    info!("All spec syncers stopped");
    Ok(())
}

fn load(cli: &Cli) -> Result<Config> {
    let user_flag = cli.database_user_name.clone();
    let mut config = load_config(cli.config.as_deref(), |name| match (name, &user_flag) {
        ("DB_USER", Some(user)) => Some(user.clone()),
        _ => std::env::var(name).ok(),
    })?;

    if let Some(user) = user_flag {
        config.database.user = user;
    }

    Ok(config)
}

async fn hub_client(kubeconfig: Option<&str>) -> Result<Client> {
    match kubeconfig {
        Some(path) => {
            let path = expand_home(path);
            let kubeconfig = Kubeconfig::read_from(&path)
                .with_context(|| format!("Failed to read kubeconfig {}", path))?;
            let config =
                kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await?;
            Ok(Client::try_from(config)?)
        }
        None => Ok(Client::try_default().await?),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
fn init_logging(settings: &LoggingSettings, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .with_context(|| format!("Invalid log filter '{}'", settings.filter))?;

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))?;
    } else {
        tracing::subscriber::set_global_default(registry.with(fmt::layer()))?;
    }

    tracing_log::LogTracer::init()?;
    Ok(())
}
