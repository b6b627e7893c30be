//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process start:
//!     CLI flags / environment
//!     → settings.rs (bind address, defaults for interval and timeout)
//!
//! every scheduler tick:
//!     targets file (YAML or TOML)
//!     → loader.rs (read, parse, resolve missing fields)
//!     → validation.rs (semantic checks)
//!     → Snapshot (immutable)
//!     → registry swaps it in, or keeps the previous one on error
//! ```
//!
//! # Design Decisions
//! - A reload replaces targets, interval and timeout together or not at all
//! - Missing interval/timeout fall back to whatever is currently active
//! - Target URLs are not checked here; bad URLs fail at probe time

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_snapshot, ConfigError};
pub use schema::{TargetConfig, TargetsDocument, DEFAULT_THRESHOLD_SECS};
pub use settings::{LogFormat, Settings};
