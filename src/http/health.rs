//! Health check endpoints

use super::AppState;
use crate::delivery::ApiClient;
use crate::forwarder::StatsSnapshot;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub marker_field: String,
    pub events: StatsSnapshot,
}

/// Health endpoint - always returns 200 if process is running
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness endpoint - the forwarder has no upstream connection to wait
/// for, so it is ready as soon as it serves requests
pub(super) async fn ready_handler<C: ApiClient + 'static>(
    State(state): State<AppState<C>>,
) -> impl IntoResponse {
    Json(ReadyResponse {
        ready: true,
        marker_field: state.forwarder.marker_field().to_string(),
        events: state.forwarder.stats().snapshot(),
    })
}

/// Metrics endpoint - returns Prometheus format metrics
pub(super) async fn metrics_handler<C: ApiClient + 'static>(
    State(state): State<AppState<C>>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}
