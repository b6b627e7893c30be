//! Pinger
//!
//! Probes HTTP(S) and TCP targets on a fixed interval and exposes the results
//! as Prometheus metrics.
//!
//! # Architecture Overview
//!
//! ```text
//!   targets file ──▶ registry ──▶ scheduler ──▶ probe (http | tcp) ┐
//!   (every tick)     (ArcSwap)    (JoinSet)                         │
//!                                                                   ▼
//!   GET /metrics ◀──────────────────────────────────────────── metrics sink
//!   GET /health  ◀── registry size
//!   POST /alert  ──▶ log
//! ```

use clap::Parser;

use pinger::config::Settings;
use pinger::lifecycle::{self, signals, Shutdown};
use pinger::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    logging::init(settings.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        targets_file = %settings.targets_file.display(),
        bind_address = %settings.bind_address,
        "pinger starting"
    );

    let shutdown = Shutdown::new();
    let running = lifecycle::start(&settings, &shutdown).await?;
    tracing::info!(address = %running.local_addr, "Listening for connections");

    let mut server = running.server;
    let server_exited = tokio::select! {
        _ = signals::wait_for_shutdown() => None,
        result = &mut server => Some(result),
    };

    shutdown.trigger();
    match server_exited {
        Some(result) => result??,
        None => server.await??,
    }
    let _ = running.scheduler.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
