//! Checks that the configured task store is reachable and readable.
//!
//! Usage:
//!
//! ```text
//! store_probe
//! ```
//!
//! Connection settings come from the `TASKKEEPER_REDIS_*` environment
//! variables. The probe connects, pings, lists every task and logs a
//! summary. Records that cannot be decoded are logged as warnings but do not
//! fail the probe; an unreachable store does. Log verbosity follows
//! `RUST_LOG` and defaults to `info`.

use std::process::ExitCode;
use std::sync::Arc;

use mockable::DefaultClock;
use taskkeeper::store::{adapters::redis::RedisStore, config::StoreConfig, ports::StoreError};
use taskkeeper::task::{
    adapters::store::KeyValueTaskRepository,
    services::{TaskServiceError, TaskTrackerService},
};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Error)]
enum ProbeError {
    #[error("failed to connect to the task store: {0}")]
    Connect(#[from] StoreError),
    #[error("task store check failed: {0}")]
    Service(#[from] TaskServiceError),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

async fn run() -> Result<(), ProbeError> {
    let config = StoreConfig::from_env().map_err(StoreError::from)?;
    tracing::info!("Probing task store at {}", config.connection_url());

    let store = RedisStore::connect(config).await?;
    let repository = KeyValueTaskRepository::new(Arc::new(store), Arc::new(DefaultClock));
    let service = TaskTrackerService::new(Arc::new(repository));

    service.health_check().await?;
    let listing = service.list_tasks().await?;

    for warning in listing.warnings() {
        tracing::warn!("Unreadable task record '{}': {}", warning.key, warning.reason);
    }
    tracing::info!(
        "Task store healthy: {} tasks, {} unreadable records",
        listing.tasks().len(),
        listing.warnings().len()
    );
    Ok(())
}
