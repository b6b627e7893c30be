//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler
//!     → metrics.rs (MetricsSink: latency, up, threshold, errors per target)
//!     → /metrics renders the sink on demand
//!
//! every subsystem
//!     → logging.rs (tracing subscriber, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - The sink owns a private recorder; nothing is installed globally
//! - Series are never evicted once created

pub mod logging;
pub mod metrics;

pub use self::metrics::{MetricRecord, MetricsSink, PrometheusSink};
