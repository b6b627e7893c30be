//! Route handlers.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use crate::http::server::AppState;
use crate::observability::MetricRecord;
use crate::probe::SeriesKey;
use crate::registry::Snapshot;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub targets: usize,
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        targets: state.registry.len(),
    })
}

pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, state.sink.content_type())],
        state.sink.render(),
    )
}

#[derive(Debug, Serialize)]
pub struct SeriesStatus {
    #[serde(flatten)]
    pub key: SeriesKey,
    #[serde(flatten)]
    pub record: MetricRecord,
}

#[derive(Debug, Serialize)]
pub struct TargetsView {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub series: Vec<SeriesStatus>,
}

pub async fn get_targets(State(state): State<AppState>) -> Json<TargetsView> {
    let snapshot = state.registry.current();
    let series = state
        .sink
        .records()
        .into_iter()
        .map(|(key, record)| SeriesStatus { key, record })
        .collect();

    Json(TargetsView {
        snapshot: (*snapshot).clone(),
        series,
    })
}

/// Accept an alert notification. Delivery is out of scope; the payload is logged.
pub async fn post_alert(Json(payload): Json<Value>) -> Json<Value> {
    tracing::warn!(payload = %payload, "Alert received");
    Json(serde_json::json!({ "status": "ok" }))
}
