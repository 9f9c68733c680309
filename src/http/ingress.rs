//! Change event ingress
//!
//! The eventing platform POSTs each mutation here. The response is always
//! `202 Accepted` for a well-formed event; delivery failures show up only in
//! logs, metrics and the returned outcome.

use super::AppState;
use crate::delivery::ApiClient;
use crate::events::ChangeEvent;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub(super) async fn ingest_handler<C: ApiClient + 'static>(
    State(state): State<AppState<C>>,
    Json(event): Json<ChangeEvent>,
) -> impl IntoResponse {
    let outcome = state.forwarder.handle(&event).await;
    (StatusCode::ACCEPTED, Json(outcome))
}
