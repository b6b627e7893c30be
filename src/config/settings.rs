//! Process-level settings.
//!
//! These come from flags or the environment and are fixed for the lifetime
//! of the process. Interval and timeout here are only the starting values;
//! the first successful reload of the targets file overrides them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for the `pinger` daemon.
#[derive(Debug, Clone, Parser)]
#[command(name = "pinger")]
#[command(about = "Periodic reachability and latency prober", long_about = None)]
pub struct Settings {
    /// Path to the targets file (YAML, or TOML when the extension is `.toml`).
    #[arg(long, env = "TARGETS_FILE", default_value = "/config/targets.yml")]
    pub targets_file: PathBuf,

    /// Interval used until the targets file supplies one.
    #[arg(long, env = "SCRAPE_INTERVAL_SECONDS", default_value_t = 15.0)]
    pub interval_seconds: f64,

    /// Probe timeout used until the targets file supplies one.
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS", default_value_t = 5.0)]
    pub request_timeout_seconds: f64,

    /// Address for the health, metrics and alert endpoints.
    #[arg(long, env = "PINGER_BIND", default_value = "0.0.0.0:8000")]
    pub bind_address: SocketAddr,

    /// Delay before the first tick, in milliseconds.
    #[arg(long, env = "PINGER_STARTUP_DELAY_MS", default_value_t = 200)]
    pub startup_delay_ms: u64,

    #[arg(long, env = "PINGER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Settings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}
