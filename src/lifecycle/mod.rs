//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → initial reload → sink → bind listener → spawn server + scheduler
//!
//! Shutdown (shutdown.rs):
//!     Signal received → latch → scheduler exits loop, server drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - A missing or broken targets file at startup is not fatal
//! - Failing to bind the listener is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{start, Running, StartupError};
