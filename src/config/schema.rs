//! Targets file schema.
//!
//! The same structure is accepted from YAML and TOML. Every field is optional
//! at the serde level; defaults are resolved by the loader because some of
//! them depend on the snapshot that is currently active.

use serde::{Deserialize, Serialize};

/// Threshold published for a target that does not configure one.
pub const DEFAULT_THRESHOLD_SECS: f64 = 1.0;

/// Root of a targets file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TargetsDocument {
    /// Endpoints to probe, in file order.
    pub targets: Vec<TargetConfig>,

    /// Seconds between ticks.
    pub interval_seconds: Option<f64>,

    /// Per-probe deadline in seconds.
    pub request_timeout_seconds: Option<f64>,
}

/// One target entry as written in the file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct TargetConfig {
    /// Display name; the URL is used when absent.
    #[serde(default)]
    pub name: Option<String>,

    /// Scheme-prefixed address (`http://`, `https://` or `tcp://`).
    #[serde(default)]
    pub url: String,

    /// Advisory latency threshold, published next to the measured latency.
    #[serde(default)]
    pub threshold_seconds: Option<f64>,
}
