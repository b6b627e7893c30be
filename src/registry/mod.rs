//! Target registry.
//!
//! # Data Flow
//! ```text
//! scheduler tick
//!     → reload(path) → loader builds a candidate from the active snapshot
//!     → Ok: ArcSwap::store (one exclusive write)
//!     → Err: active snapshot untouched, error returned to the scheduler
//!
//! readers (scheduler batch, /health, /targets)
//!     → current() → Arc<Snapshot>, stable for as long as it is held
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::{load_snapshot, ConfigError};

/// A resolved probe target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    pub threshold_secs: f64,
}

/// Targets plus the global timing active for one or more ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub targets: Vec<Target>,
    pub interval_secs: f64,
    pub timeout_secs: f64,
}

impl Snapshot {
    /// A snapshot with no targets, used before the first successful reload.
    pub fn empty(interval_secs: f64, timeout_secs: f64) -> Self {
        Self {
            targets: Vec::new(),
            interval_secs,
            timeout_secs,
        }
    }

    /// Values outside the `Duration` range saturate to `Duration::MAX`;
    /// validation keeps them out of loaded snapshots.
    pub fn interval(&self) -> Duration {
        to_duration(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        to_duration(self.timeout_secs)
    }
}

fn to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Holds the most recently loaded snapshot.
#[derive(Debug)]
pub struct TargetRegistry {
    active: ArcSwap<Snapshot>,
}

impl TargetRegistry {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            active: ArcSwap::from_pointee(initial),
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.active.load_full()
    }

    /// Number of targets in the active snapshot.
    pub fn len(&self) -> usize {
        self.active.load().targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the active snapshot with one loaded from `path`.
    ///
    /// On error nothing changes.
    pub fn reload(&self, path: &Path) -> Result<Arc<Snapshot>, ConfigError> {
        let previous = self.current();
        let next = Arc::new(load_snapshot(path, &previous)?);
        self.active.store(next.clone());
        Ok(next)
    }
}
