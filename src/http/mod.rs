//! HTTP surface
//!
//! Change event ingress plus health, readiness and metrics endpoints.

mod health;
mod ingress;

pub use health::{HealthResponse, ReadyResponse};

use crate::delivery::ApiClient;
use crate::forwarder::EventForwarder;
use crate::metrics::ForwarderMetrics;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Application state shared by all handlers
pub struct AppState<C> {
    pub forwarder: Arc<EventForwarder<C>>,
    pub metrics: Arc<ForwarderMetrics>,
}

// Manual impl: derive would require `C: Clone`
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            forwarder: Arc::clone(&self.forwarder),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Create the service router
pub fn router<C>(state: AppState<C>) -> Router
where
    C: ApiClient + 'static,
{
    Router::new()
        .route("/events", post(ingress::ingest_handler::<C>))
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler::<C>))
        .route("/metrics", get(health::metrics_handler::<C>))
        .with_state(state)
}
