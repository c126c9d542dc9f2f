use std::time::Duration;

use anyhow::{Context, bail};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vaxtrack_core::{MIGRATOR, application::AppUnitOfWork};

use crate::infra::config::{Config, ConfigWarnings};

const DEFAULT_LOG_FILTER: &str = "info,vaxtrack=info,tower_http=warn";

/// Installs the global subscriber. Override the filter via `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn log_config_warnings(warnings: &ConfigWarnings) {
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

/// Connects to PostgreSQL and applies pending migrations.
pub async fn connect_postgres(database_url: &str) -> anyhow::Result<sqlx::PgPool> {
    if !(database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")) {
        bail!("Invalid database URL: must start with postgres:// or postgresql://");
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("database migration failed")?;
    info!("Database migrations applied");

    Ok(pool)
}

/// Repository ports for the configured store; in-memory when no database is set.
pub async fn open_unit_of_work(config: &Config) -> anyhow::Result<AppUnitOfWork> {
    match config.database.url.as_deref() {
        Some(url) => {
            let pool = connect_postgres(url).await?;
            info!("Successfully connected to PostgreSQL");
            Ok(AppUnitOfWork::from_postgres(pool))
        }
        None => {
            warn!("No database configured; using the in-memory record store");
            Ok(AppUnitOfWork::in_memory())
        }
    }
}
