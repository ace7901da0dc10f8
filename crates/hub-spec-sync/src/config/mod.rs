pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_with_env};
pub use schema::{
    Config, DatabaseSettings, HubSettings, LoggingSettings, PolicySettings, SyncSettings,
};
