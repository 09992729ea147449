//! Settings for a translation manager session.
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use manager::ConfigManager;
pub use types::{
    CONFIG_FILE_NAME,
    ConfigError,
    LatencyConfig,
    ManagerSettings,
    StaleTimeConfig,
};
