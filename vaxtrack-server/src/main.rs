use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{error, info};
use vaxtrack_core::clock::{Clock, SystemClock};
use vaxtrack_server::{
    AppState, create_app,
    infra::{
        config::{Config, ConfigLoad, ConfigLoader},
        startup::{connect_postgres, init_tracing, log_config_warnings, open_unit_of_work},
        sweeper::FollowUpSweeper,
    },
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "vaxtrack-server")]
#[command(about = "Pharmacist vaccination records, follow-up tracking and ADR escalation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "VAXTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// PostgreSQL connection URL (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one overdue follow-up sweep and exit
    Sweep,
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        Some(Command::Sweep) => run_sweep(config).await,
        None => run_server(config).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }
    if let Some(url) = args.database_url.clone() {
        config.database.url = Some(url);
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    log_config_warnings(&warnings);

    info!(
        grace_period_days = config.core.follow_up.grace_period_days,
        sweep_interval = ?config.sweep_interval,
        recent_window = config.core.dashboard.recent_window,
        due_list_limit = config.core.dashboard.due_list_limit,
        "follow-up configuration in effect"
    );

    Ok(config)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL or database.url must be set to run migrations")?;
    connect_postgres(url).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn build_state(config: Config) -> anyhow::Result<AppState> {
    let unit_of_work = open_unit_of_work(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    Ok(AppState::new(unit_of_work, clock, Arc::new(config)))
}

async fn run_sweep(config: Config) -> anyhow::Result<()> {
    let state = build_state(config).await?;
    let report = state
        .records
        .sweep_overdue_now()
        .await
        .context("overdue follow-up sweep failed")?;
    info!(
        cutoff = %report.cutoff,
        missed = report.missed.len(),
        "sweep complete"
    );
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let sweep_interval = config.sweep_interval;

    let state = build_state(config).await?;
    let sweeper = FollowUpSweeper::new(state.records.clone(), sweep_interval).spawn();

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!(address = %format!("{host}:{port}"), "VaxTrack server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error");

    sweeper.abort();
    info!("VaxTrack server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
