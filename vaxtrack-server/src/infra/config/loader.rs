use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;
use vaxtrack_core::config::{CoreSettings, DashboardSettings, FollowUpSettings};

use super::{
    models::{
        Config, ConfigMetadata, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL,
        DatabaseConfig, ServerConfig,
    },
    sources::{EnvConfig, FileConfig},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["vaxtrack.toml", "config/vaxtrack.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Layers configuration: environment over TOML file over defaults.
///
/// CLI flags are applied by the binary on top of the loaded [`Config`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads `.env` (if any), reads the process environment and composes the
    /// final configuration.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Composes configuration from an already gathered environment. Does not
    /// touch `.env` or the process environment.
    pub fn load_with_env(&self, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push(
                "no configuration file found; using environment and defaults",
                Some("create vaxtrack.toml or pass --config".to_string()),
            );
        }

        let config = compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(FileConfig, Option<PathBuf>), ConfigLoadError> {
        let source = ConfigPathSource {
            explicit: self.options.config_path.clone(),
            env: env.config_path.clone(),
            default: DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists()),
        };

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((FileConfig::default(), None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((FileConfig::default(), None));
        }

        let file_config = read_file_config(&path)?;
        Ok((file_config, Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose_config(
    file: FileConfig,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<Config, ConfigLoadError> {
    let env_port = env
        .server_port
        .as_deref()
        .map(|raw| parse_number::<u16>("SERVER_PORT", raw))
        .transpose()?;
    let server = ServerConfig {
        host: env
            .server_host
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env_port.or(file.server.port).unwrap_or(DEFAULT_PORT),
    };

    let database = DatabaseConfig {
        url: env.database_url.or_else(|| {
            file.database
                .url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
        }),
    };

    let sweep_interval = match env.sweep_interval {
        Some(raw) => parse_interval("VAXTRACK_SWEEP_INTERVAL", &raw)?,
        None => match file.follow_up.sweep_interval.as_deref() {
            Some(raw) => parse_interval("follow_up.sweep_interval", raw)?,
            None => DEFAULT_SWEEP_INTERVAL,
        },
    };

    let env_grace = env
        .grace_period_days
        .as_deref()
        .map(|raw| parse_number::<u32>("VAXTRACK_GRACE_PERIOD_DAYS", raw))
        .transpose()?;
    let follow_up_defaults = FollowUpSettings::default();
    let dashboard_defaults = DashboardSettings::default();
    let core = CoreSettings {
        follow_up: FollowUpSettings {
            grace_period_days: env_grace
                .or(file.follow_up.grace_period_days)
                .unwrap_or(follow_up_defaults.grace_period_days),
        },
        dashboard: DashboardSettings {
            recent_window: file
                .dashboard
                .recent_window
                .unwrap_or(dashboard_defaults.recent_window),
            due_list_limit: file
                .dashboard
                .due_list_limit
                .unwrap_or(dashboard_defaults.due_list_limit),
            due_soon_horizon_days: file
                .dashboard
                .due_soon_horizon_days
                .unwrap_or(dashboard_defaults.due_soon_horizon_days),
        },
    };
    core.validate().map_err(|err| ConfigLoadError::Invalid {
        key: err.field,
        reason: err.reason,
    })?;

    Ok(Config {
        server,
        database,
        sweep_interval,
        core,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    })
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigLoadError> {
    raw.trim().parse().map_err(|_| ConfigLoadError::Invalid {
        key,
        reason: format!("`{raw}` is not a valid number"),
    })
}

fn parse_interval(key: &'static str, raw: &str) -> Result<Duration, ConfigLoadError> {
    let interval = humantime::parse_duration(raw.trim()).map_err(|err| {
        ConfigLoadError::Invalid {
            key,
            reason: format!("`{raw}` is not a duration: {err}"),
        }
    })?;
    if interval.is_zero() {
        return Err(ConfigLoadError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(interval)
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>, hint: Option<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
