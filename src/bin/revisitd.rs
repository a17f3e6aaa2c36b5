//! Reminder daemon.
//!
//! Usage:
//!
//! ```text
//! REVISIT_DATABASE_URL=postgres://... REVISIT_TELEGRAM_TOKEN=... revisitd
//! ```
//!
//! On start the daemon creates the review tables if needed, restores a timer
//! for every active task, runs one catch-up sweep and then sweeps daily at
//! `REVISIT_SWEEP_HOUR` (UTC). Reminders are delivered through the Telegram
//! Bot API. Ctrl-C cancels all pending timers and exits. Log verbosity follows
//! `RUST_LOG` and defaults to `info`.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::{Clock, DefaultClock};
use revisit::{
    config::{ConfigError, DaemonConfig},
    review::{
        adapters::{
            TelegramGateway,
            postgres::{PostgresReviewTaskRepository, ReviewPgPool, apply_schema},
        },
        ports::TaskRepositoryError,
        services::{ReminderScheduler, SchedulerError},
    },
};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the daemon.
#[derive(Debug, Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build connection pool: {0}")]
    Pool(#[source] PoolError),

    #[error("failed to prepare schema: {0}")]
    Schema(#[source] TaskRepositoryError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("failed to start runtime: {0}")]
    RuntimeInit(#[source] io::Error),

    #[error("failed to wait for shutdown signal: {0}")]
    Signal(#[source] io::Error),
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DaemonConfig::from_env().map_err(DaemonError::from)?;
    let pool = build_pool(&config)?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DaemonError::RuntimeInit)?;

    if let Err(err) = runtime.block_on(run(config, pool)) {
        error!(error = %err, "revisitd stopped with an error");
        return Err(err.into());
    }
    Ok(())
}

fn build_pool(config: &DaemonConfig) -> Result<ReviewPgPool, DaemonError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .map_err(DaemonError::Pool)
}

async fn run(config: DaemonConfig, pool: ReviewPgPool) -> Result<(), DaemonError> {
    apply_schema(&pool).await.map_err(DaemonError::Schema)?;

    let clock = Arc::new(DefaultClock);
    let scheduler = ReminderScheduler::new(
        Arc::new(PostgresReviewTaskRepository::new(pool)),
        Arc::new(TelegramGateway::new(
            &config.telegram_api,
            &config.telegram_token,
        )),
        Arc::clone(&clock),
    );

    scheduler.restore().await?;
    scheduler.sweep(clock.utc()).await?;

    let sweep_config = config.scheduler;
    let daily = scheduler.clone();
    let sweeper = tokio::spawn(async move { daily.run_daily_sweep(sweep_config).await });
    info!(sweep_time = %sweep_config.sweep_time(), "revisitd running");

    let signal = tokio::signal::ctrl_c().await;
    sweeper.abort();
    let cancelled = scheduler.cancel_all();
    info!(cancelled, "revisitd shutting down");
    signal.map_err(DaemonError::Signal)
}
