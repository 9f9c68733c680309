//! Prometheus metrics module
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed, so library and test use need no setup.

use crate::error::ForwarderError;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Forwarder metrics collector
#[derive(Clone, Default)]
pub struct ForwarderMetrics {
    handle: Option<PrometheusHandle>,
}

impl ForwarderMetrics {
    /// Install the global Prometheus recorder
    pub fn install() -> Result<Self, ForwarderError> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| ForwarderError::MetricsInstall(Box::new(e)))?;

        Self::register_metrics();

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Metrics without an exporter; `render` yields an empty string
    pub fn detached() -> Self {
        Self::default()
    }

    fn register_metrics() {
        describe_counter!(
            "forwarder_events_received_total",
            Unit::Count,
            "Total change events received"
        );
        describe_counter!(
            "forwarder_events_skipped_total",
            Unit::Count,
            "Change events skipped because the marker field was present"
        );
        describe_counter!(
            "forwarder_deliveries_total",
            Unit::Count,
            "Outbound deliveries by outcome"
        );
        describe_counter!(
            "forwarder_errors_total",
            Unit::Count,
            "Forwarding errors by type"
        );
        describe_histogram!(
            "forwarder_delivery_duration_seconds",
            Unit::Seconds,
            "Round-trip time of the outbound call"
        );
    }

    pub fn record_event_received(&self) {
        counter!("forwarder_events_received_total").increment(1);
    }

    pub fn record_skipped(&self) {
        counter!("forwarder_events_skipped_total").increment(1);
    }

    /// Record a delivery that got an HTTP response
    pub fn record_delivery(&self, outcome: &'static str, duration: Duration) {
        counter!("forwarder_deliveries_total", "outcome" => outcome).increment(1);
        histogram!("forwarder_delivery_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a failed delivery
    pub fn record_error(&self, error_type: &'static str) {
        counter!("forwarder_deliveries_total", "outcome" => "failed").increment(1);
        counter!("forwarder_errors_total", "error_type" => error_type).increment(1);
    }

    /// Render metrics in Prometheus format
    pub fn render(&self) -> String {
        self.handle
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_metrics_record_without_recorder() {
        let metrics = ForwarderMetrics::detached();
        metrics.record_event_received();
        metrics.record_skipped();
        metrics.record_delivery("delivered", Duration::from_millis(12));
        metrics.record_error("transport");

        assert!(metrics.render().is_empty());
    }
}
