//! Probe metrics and their exposition.
//!
//! # Metrics
//! - `ping_latency_seconds` (gauge): latency of the last successful probe
//! - `ping_up` (gauge): 1 if the last probe succeeded, otherwise 0
//! - `ping_latency_threshold_seconds` (gauge): configured alert threshold
//! - `ping_errors_total` (counter): failed probes
//!
//! All series carry the labels `name`, `scheme` and `target`.
//!
//! # Design Decisions
//! - A failed probe leaves the latency gauge at its last successful value.
//!   Stale latency stays visible until the next success; `ping_up` is the
//!   signal to look at.
//! - Threshold is only written on success, next to the latency it applies to

use ::metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use dashmap::DashMap;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use serde::Serialize;

use crate::probe::{ProbeOutcome, SeriesKey};

pub const LATENCY_SECONDS: &str = "ping_latency_seconds";
pub const UP: &str = "ping_up";
pub const THRESHOLD_SECONDS: &str = "ping_latency_threshold_seconds";
pub const ERRORS_TOTAL: &str = "ping_errors_total";

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Last observed values for one series key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricRecord {
    /// Latency of the last successful probe.
    pub latency_secs: Option<f64>,
    pub threshold_secs: Option<f64>,
    pub up: bool,
    pub errors: u64,
}

/// Destination for probe outcomes.
pub trait MetricsSink: Send + Sync {
    /// Publish one outcome. `threshold_secs` is the target's configured threshold.
    fn record(&self, outcome: &ProbeOutcome, threshold_secs: f64);

    /// Current contents in the sink's exposition format. Never fails.
    fn render(&self) -> String;

    fn content_type(&self) -> &'static str {
        PROMETHEUS_CONTENT_TYPE
    }

    /// Current values for one key, if it has ever been observed.
    fn record_for(&self, key: &SeriesKey) -> Option<MetricRecord>;

    /// Every observed key with its current values, sorted by key.
    fn records(&self) -> Vec<(SeriesKey, MetricRecord)>;
}

/// Prometheus-backed sink.
///
/// Writes go to a private `PrometheusRecorder` and to an in-process mirror
/// used for reads that should not go through text rendering.
pub struct PrometheusSink {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    records: DashMap<SeriesKey, MetricRecord>,
}

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

fn labels(key: &SeriesKey) -> Vec<Label> {
    vec![
        Label::new("name", key.name.clone()),
        Label::new("scheme", key.scheme.clone()),
        Label::new("target", key.target.clone()),
    ]
}

impl PrometheusSink {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        recorder.describe_gauge(
            KeyName::from_const_str(LATENCY_SECONDS),
            None,
            SharedString::const_str("Measured end-to-end latency for a target"),
        );
        recorder.describe_gauge(
            KeyName::from_const_str(UP),
            None,
            SharedString::const_str("1 if last probe succeeded, otherwise 0"),
        );
        recorder.describe_gauge(
            KeyName::from_const_str(THRESHOLD_SECONDS),
            None,
            SharedString::const_str("Alert threshold per target (seconds)"),
        );
        recorder.describe_counter(
            KeyName::from_const_str(ERRORS_TOTAL),
            None,
            SharedString::const_str("Total probe errors"),
        );

        Self {
            recorder,
            handle,
            records: DashMap::new(),
        }
    }

    fn set_gauge(&self, name: &'static str, key: &SeriesKey, value: f64) {
        self.recorder
            .register_gauge(&Key::from_parts(name, labels(key)), &METADATA)
            .set(value);
    }

    fn increment_errors(&self, key: &SeriesKey) {
        self.recorder
            .register_counter(&Key::from_parts(ERRORS_TOTAL, labels(key)), &METADATA)
            .increment(1);
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrometheusSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusSink")
            .field("series", &self.records.len())
            .finish()
    }
}

impl MetricsSink for PrometheusSink {
    fn record(&self, outcome: &ProbeOutcome, threshold_secs: f64) {
        let key = &outcome.key;
        // The entry guard serializes writers of the same key.
        let mut record = self.records.entry(key.clone()).or_default();

        match outcome.latency() {
            Some(latency) => {
                let latency_secs = latency.as_secs_f64();
                self.set_gauge(LATENCY_SECONDS, key, latency_secs);
                self.set_gauge(THRESHOLD_SECONDS, key, threshold_secs);
                self.set_gauge(UP, key, 1.0);
                record.latency_secs = Some(latency_secs);
                record.threshold_secs = Some(threshold_secs);
                record.up = true;
            }
            None => {
                self.increment_errors(key);
                self.set_gauge(UP, key, 0.0);
                record.errors += 1;
                record.up = false;
            }
        }
    }

    fn render(&self) -> String {
        self.handle.render()
    }

    fn record_for(&self, key: &SeriesKey) -> Option<MetricRecord> {
        self.records.get(key).map(|record| record.clone())
    }

    fn records(&self) -> Vec<(SeriesKey, MetricRecord)> {
        let mut all: Vec<_> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}
