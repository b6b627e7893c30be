//! Startup orchestration.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::validation::{validate_snapshot, ValidationError};
use crate::config::Settings;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::{MetricsSink, PrometheusSink};
use crate::probe::build_client;
use crate::registry::{Snapshot, TargetRegistry};
use crate::scheduler::ProbeScheduler;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP probe client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid settings: {0:?}")]
    Settings(Vec<ValidationError>),
}

/// Handles to a started instance.
pub struct Running {
    pub local_addr: SocketAddr,
    pub registry: Arc<TargetRegistry>,
    pub server: JoinHandle<Result<(), std::io::Error>>,
    pub scheduler: JoinHandle<()>,
}

/// Bring up registry, sink, HTTP server and scheduler.
pub async fn start(settings: &Settings, shutdown: &Shutdown) -> Result<Running, StartupError> {
    let defaults = Snapshot::empty(settings.interval_seconds, settings.request_timeout_seconds);
    validate_snapshot(&defaults).map_err(StartupError::Settings)?;

    let registry = Arc::new(TargetRegistry::new(defaults));
    match registry.reload(&settings.targets_file) {
        Ok(snapshot) => tracing::info!(
            path = %settings.targets_file.display(),
            targets = snapshot.targets.len(),
            interval_secs = snapshot.interval_secs,
            timeout_secs = snapshot.timeout_secs,
            "Targets loaded"
        ),
        Err(e) => tracing::warn!(
            path = %settings.targets_file.display(),
            error = %e,
            "Initial targets load failed, starting with no targets"
        ),
    }

    let sink: Arc<dyn MetricsSink> = Arc::new(PrometheusSink::new());
    let client = build_client()?;

    let listener = TcpListener::bind(settings.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            addr: settings.bind_address,
            source,
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| StartupError::Bind {
            addr: settings.bind_address,
            source,
        })?;

    let server = HttpServer::new(AppState {
        registry: registry.clone(),
        sink: sink.clone(),
    });
    let server_shutdown = shutdown.subscribe();
    let server = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let scheduler = ProbeScheduler::new(
        registry.clone(),
        sink.clone(),
        client,
        settings.targets_file.clone(),
    )
    .with_startup_delay(settings.startup_delay());
    let scheduler_shutdown = shutdown.subscribe();
    let scheduler = tokio::spawn(scheduler.run(scheduler_shutdown));

    Ok(Running {
        local_addr,
        registry,
        server,
        scheduler,
    })
}
