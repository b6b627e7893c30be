//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, body limit)
//! - Serve on a listener until shutdown

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::http::handlers::{get_health, get_metrics, get_targets, post_alert};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::MetricsSink;
use crate::registry::TargetRegistry;

const MAX_ALERT_BODY_BYTES: usize = 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TargetRegistry>,
    pub sink: Arc<dyn MetricsSink>,
}

/// HTTP server for the health, metrics and alert endpoints.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(get_health))
            .route("/metrics", get(get_metrics))
            .route("/targets", get(get_targets))
            .route(
                "/alert",
                post(post_alert).layer(RequestBodyLimitLayer::new(MAX_ALERT_BODY_BYTES)),
            )
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
