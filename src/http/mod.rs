//! HTTP boundary.
//!
//! # Data Flow
//! ```text
//! GET  /health   → registry size, no probing
//! GET  /metrics  → sink.render()
//! GET  /targets  → active snapshot plus per-series state as JSON
//! POST /alert    → log payload, acknowledge
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
