//! Probe executors.
//!
//! # Data Flow
//! ```text
//! Target.url
//!     → classify.rs (scheme dispatch, series labels, config errors before I/O)
//!     → http.rs  GET with redirects, body fully read
//!     → tcp.rs   connect, then close
//!     → run_probe wraps the call in the per-probe deadline
//!     → ProbeOutcome (series key + Ok(latency) | Err(ProbeError))
//! ```
//!
//! # Design Decisions
//! - Success/failure is binary; the error kind is only used for logging
//! - Probes never panic or raise: every failure is a value

pub mod classify;
pub mod http;
pub mod tcp;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time;

use crate::registry::Target;

pub use classify::{classify, Classification, ProbeTarget};
pub use http::{build_client, HttpProbe};
pub use tcp::TcpProbe;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a single probe failed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("unsupported URL scheme in '{0}', use http(s):// or tcp://")]
    UnsupportedScheme(String),

    #[error("tcp target '{0}' must be tcp://host:port")]
    MalformedTcpTarget(String),

    #[error("malformed target '{url}': {reason}")]
    MalformedTarget { url: String, reason: String },

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(#[source] BoxError),

    #[error("unexpected response status {0}")]
    Response(reqwest::StatusCode),
}

impl ProbeError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::UnsupportedScheme(_) => "unsupported_scheme",
            ProbeError::MalformedTcpTarget(_) => "malformed_tcp_target",
            ProbeError::MalformedTarget { .. } => "malformed_target",
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Connection(_) => "connection",
            ProbeError::Response(_) => "response",
        }
    }

    /// True for errors raised before any network I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ProbeError::UnsupportedScheme(_)
                | ProbeError::MalformedTcpTarget(_)
                | ProbeError::MalformedTarget { .. }
        )
    }
}

/// Metric identity of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeriesKey {
    pub name: String,
    pub scheme: String,
    pub target: String,
}

impl SeriesKey {
    pub fn new(
        name: impl Into<String>,
        scheme: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            scheme: scheme.into(),
            target: target.into(),
        }
    }
}

/// Result of probing one target once.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub key: SeriesKey,
    pub result: Result<Duration, ProbeError>,
}

impl ProbeOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn latency(&self) -> Option<Duration> {
        self.result.as_ref().ok().copied()
    }
}

/// A single capability: reach something and report how long it took.
pub trait Probe {
    /// Measure latency to the target. `timeout` is a hint for lower layers;
    /// the hard deadline is applied by [`run_probe`].
    fn probe(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Duration, ProbeError>> + Send;
}

/// Probe one target under its deadline. Never fails; errors land in the outcome.
pub async fn run_probe(
    target: &Target,
    timeout: Duration,
    client: &reqwest::Client,
) -> ProbeOutcome {
    let Classification {
        scheme,
        label,
        target: probe_target,
    } = classify(&target.url, client);
    let key = SeriesKey::new(target.name.clone(), scheme, label);

    let result = match probe_target {
        Ok(probe_target) => match time::timeout(timeout, probe_target.probe(timeout)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(timeout)),
        },
        Err(e) => Err(e),
    };

    match &result {
        Ok(latency) => tracing::debug!(
            name = %key.name,
            target = %key.target,
            latency_ms = latency.as_secs_f64() * 1000.0,
            "Probe succeeded"
        ),
        Err(e) => tracing::warn!(
            name = %key.name,
            target = %key.target,
            kind = e.kind(),
            error = %e,
            "Probe failed"
        ),
    }

    ProbeOutcome { key, result }
}
