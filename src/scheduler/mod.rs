//! Probe scheduling.
//!
//! # Data Flow
//! ```text
//! STARTING
//!     → startup delay (lets the HTTP server come up first)
//! STEADY, once per tick:
//!     → registry.reload(path)        error: keep previous snapshot
//!     → no targets?                  sleep interval, next tick
//!     → one task per target (JoinSet), each under its own deadline
//!     → record each outcome into the sink as it resolves
//!     → join the whole batch
//!     → sleep interval
//! ```
//!
//! # Design Decisions
//! - Batches never overlap; in-flight probes are bounded by the target count
//! - The interval is measured from the end of a batch, not its start
//! - Nothing inside a tick can end the loop; only the shutdown signal does

pub mod runner;

pub use runner::{ProbeScheduler, TickReport};
