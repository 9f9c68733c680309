//! Change event handler
//!
//! One invocation per change event: skip on marker, otherwise build the
//! payload and make exactly one outbound call. Every failure is logged and
//! absorbed here; callers always get an outcome, never an error.

use crate::config::ForwarderConfig;
use crate::delivery::ApiClient;
use crate::error::ForwarderError;
use crate::events::{ChangeEvent, ForwardPayload, IdPrecedence};
use crate::forwarder::stats::ForwarderStats;
use crate::metrics::ForwarderMetrics;

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Terminal state of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ForwardOutcome {
    /// Marker field present, no call made
    Skipped,
    /// Endpoint answered 2xx
    Delivered { status: u16 },
    /// Endpoint answered with a non-2xx status
    Rejected { status: u16 },
    /// Payload never reached the endpoint
    Failed { error_type: &'static str },
}

impl ForwardOutcome {
    /// True if an outbound call was attempted
    pub fn was_forwarded(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

/// Forwards change events to the API endpoint
pub struct EventForwarder<C> {
    client: C,
    marker_field: String,
    id_precedence: IdPrecedence,
    credentialed: bool,
    stats: ForwarderStats,
    metrics: Arc<ForwarderMetrics>,
}

impl<C: ApiClient> EventForwarder<C> {
    pub fn new(config: &ForwarderConfig, client: C, metrics: Arc<ForwarderMetrics>) -> Self {
        Self {
            client,
            marker_field: config.marker_field.clone(),
            id_precedence: config.id_precedence,
            credentialed: config.is_credentialed(),
            stats: ForwarderStats::new(),
            metrics,
        }
    }

    /// Get shared statistics (for readiness checks)
    pub fn stats(&self) -> ForwarderStats {
        self.stats.clone()
    }

    pub fn marker_field(&self) -> &str {
        &self.marker_field
    }

    /// Handle a single change event
    pub async fn handle(&self, event: &ChangeEvent) -> ForwardOutcome {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("change_event", %invocation_id, document_id = %event.id());

        self.process(event).instrument(span).await
    }

    async fn process(&self, event: &ChangeEvent) -> ForwardOutcome {
        self.stats.record_received();
        self.metrics.record_event_received();

        if event.has_marker(&self.marker_field) {
            info!(
                marker_field = %self.marker_field,
                "Marker field exists in the document, skipping API call"
            );
            self.stats.record_skipped();
            self.metrics.record_skipped();
            return ForwardOutcome::Skipped;
        }

        let payload = ForwardPayload::build(event, self.id_precedence);
        let body = match payload.to_json_vec() {
            Ok(body) => body,
            Err(source) => {
                return self.fail(ForwarderError::SerializationFailed {
                    document_id: event.id().to_string(),
                    source,
                });
            }
        };

        info!(
            endpoint = %self.client.endpoint(),
            fields = payload.fields().len(),
            bytes = body.len(),
            credentialed = self.credentialed,
            "Forwarding document to API"
        );
        debug!(payload = %String::from_utf8_lossy(&body), "Forward payload");

        match self.client.post_json(body).await {
            Ok(response) if response.is_success() => {
                info!(
                    status = response.status,
                    duration_ms = response.duration.as_millis() as u64,
                    response = %response.body,
                    "API response"
                );
                self.stats.record_delivered();
                self.metrics.record_delivery("delivered", response.duration);
                ForwardOutcome::Delivered {
                    status: response.status,
                }
            }
            Ok(response) => {
                warn!(
                    status = response.status,
                    duration_ms = response.duration.as_millis() as u64,
                    response = %response.body,
                    "API returned non-success status"
                );
                self.stats.record_rejected();
                self.metrics.record_delivery("rejected", response.duration);
                ForwardOutcome::Rejected {
                    status: response.status,
                }
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&self, err: ForwarderError) -> ForwardOutcome {
        let error_type = err.error_type_label();
        let cause = std::error::Error::source(&err)
            .map(ToString::to_string)
            .unwrap_or_default();

        error!(error = %err, cause = %cause, error_type, "Error calling API");

        self.stats.record_failed();
        self.metrics.record_error(error_type);
        ForwardOutcome::Failed { error_type }
    }
}
