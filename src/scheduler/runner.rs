//! The scheduler loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time;

use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::MetricsSink;
use crate::probe::run_probe;
use crate::registry::TargetRegistry;

const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(200);

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Whether the targets file was reloaded; false means stale config was used.
    pub reloaded: bool,
    pub probed: usize,
    pub failed: usize,
    /// Probe tasks that panicked. Their outcome is lost, siblings are not.
    pub panicked: usize,
    /// Interval of the snapshot used for this tick.
    pub interval: Duration,
}

/// Periodically probes every target in the registry.
pub struct ProbeScheduler {
    registry: Arc<TargetRegistry>,
    sink: Arc<dyn MetricsSink>,
    client: reqwest::Client,
    config_path: PathBuf,
    startup_delay: Duration,
}

impl ProbeScheduler {
    pub fn new(
        registry: Arc<TargetRegistry>,
        sink: Arc<dyn MetricsSink>,
        client: reqwest::Client,
        config_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            sink,
            client,
            config_path: config_path.into(),
            startup_delay: DEFAULT_STARTUP_DELAY,
        }
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        tracing::info!(
            config_path = %self.config_path.display(),
            startup_delay_ms = self.startup_delay.as_millis() as u64,
            "Probe scheduler starting"
        );

        tokio::select! {
            _ = time::sleep(self.startup_delay) => {}
            _ = shutdown.recv() => {
                tracing::info!("Probe scheduler stopped before first tick");
                return;
            }
        }

        loop {
            let report = tokio::select! {
                report = self.tick() => report,
                _ = shutdown.recv() => break,
            };

            tokio::select! {
                _ = time::sleep(report.interval) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!("Probe scheduler received shutdown signal, exiting loop");
    }

    /// One reload + probe-all cycle, without the trailing sleep.
    pub async fn tick(&self) -> TickReport {
        let reloaded = match self.registry.reload(&self.config_path) {
            Ok(snapshot) => {
                tracing::debug!(
                    targets = snapshot.targets.len(),
                    interval_secs = snapshot.interval_secs,
                    timeout_secs = snapshot.timeout_secs,
                    "Targets reloaded"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    error = %e,
                    "Failed to reload targets, keeping previous configuration"
                );
                false
            }
        };

        let snapshot = self.registry.current();
        let mut report = TickReport {
            reloaded,
            probed: 0,
            failed: 0,
            panicked: 0,
            interval: snapshot.interval(),
        };

        if snapshot.targets.is_empty() {
            tracing::debug!("No targets configured, skipping probes");
            return report;
        }

        let timeout = snapshot.timeout();
        let mut batch = JoinSet::new();
        for index in 0..snapshot.targets.len() {
            let snapshot = snapshot.clone();
            let sink = self.sink.clone();
            let client = self.client.clone();
            batch.spawn(async move {
                let target = &snapshot.targets[index];
                let outcome = run_probe(target, timeout, &client).await;
                sink.record(&outcome, target.threshold_secs);
                outcome.succeeded()
            });
        }

        while let Some(joined) = batch.join_next().await {
            report.probed += 1;
            match joined {
                Ok(true) => {}
                Ok(false) => report.failed += 1,
                Err(e) => {
                    report.failed += 1;
                    report.panicked += 1;
                    tracing::error!(error = %e, "Probe task aborted");
                }
            }
        }

        tracing::info!(
            probed = report.probed,
            failed = report.failed,
            reloaded = report.reloaded,
            "Tick complete"
        );
        report
    }
}
