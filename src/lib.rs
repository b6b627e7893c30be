//! Periodic reachability and latency prober.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod registry;
pub mod scheduler;

pub use config::Settings;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{MetricsSink, PrometheusSink};
pub use registry::{Snapshot, Target, TargetRegistry};
pub use scheduler::ProbeScheduler;
