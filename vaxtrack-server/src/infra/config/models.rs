use std::{path::PathBuf, time::Duration};

use vaxtrack_core::config::CoreSettings;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// How often the overdue follow-up sweep runs.
    pub sweep_interval: Duration,
    pub core: CoreSettings,
    pub metadata: ConfigMetadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            core: CoreSettings::default(),
            metadata: ConfigMetadata::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Absent means records live in memory for the life of the process.
    pub url: Option<String>,
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
