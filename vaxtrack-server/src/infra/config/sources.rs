use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub follow_up: FileFollowUpConfig,
    #[serde(default)]
    pub dashboard: FileDashboardConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileFollowUpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_days: Option<u32>,
    /// Humantime duration, e.g. `"1h"` or `"15m"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_interval: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileDashboardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_window: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_list_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_soon_horizon_days: Option<u32>,
}

/// Values read from the process environment. Numeric values are kept raw so
/// that a malformed value fails loading instead of being ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub database_url: Option<String>,
    pub config_path: Option<PathBuf>,
    pub grace_period_days: Option<String>,
    pub sweep_interval: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            server_host: non_empty_var("SERVER_HOST"),
            server_port: non_empty_var("SERVER_PORT"),
            database_url: non_empty_var("DATABASE_URL"),
            config_path: non_empty_var("VAXTRACK_CONFIG").map(PathBuf::from),
            grace_period_days: non_empty_var("VAXTRACK_GRACE_PERIOD_DAYS"),
            sweep_interval: non_empty_var("VAXTRACK_SWEEP_INTERVAL"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
