//! Domain error types for the document change forwarder
//!
//! main.rs is the ONLY module allowed to use anyhow::Result (process boundary).
//! All application code returns Result<T, ForwarderError>.

use thiserror::Error;

/// Forwarder domain errors
///
/// Every variant carries structured context fields for diagnostics.
/// Operators can pattern-match on the variant to understand the failure
/// mode without parsing error message strings.
///
/// Example log output:
/// ```text
/// ForwarderError::RequestTimedOut { endpoint: "https://api.example.com/ingest", timeout_ms: 5000 }
/// → "request to 'https://api.example.com/ingest' timed out after 5000ms"
/// ```
#[derive(Error, Debug)]
pub enum ForwarderError {
    /// Forward payload could not be converted to JSON text
    #[error("payload serialization failed for document '{document_id}'")]
    SerializationFailed {
        document_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Outbound call could not reach the endpoint
    #[error("request to '{endpoint}' failed")]
    TransportFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound call exceeded the configured client timeout
    #[error("request to '{endpoint}' timed out after {timeout_ms}ms")]
    RequestTimedOut { endpoint: String, timeout_ms: u64 },

    /// HTTP client could not be constructed from the configuration
    #[error("HTTP client construction failed")]
    HttpClientBuild(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Prometheus recorder could not be installed
    #[error("metrics recorder installation failed")]
    MetricsInstall(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error (environment variable missing or invalid)
    #[error("configuration error: {0}")]
    Config(String),
}

impl ForwarderError {
    /// Returns a static label string suitable for Prometheus metrics.
    ///
    /// Used as the `error_type` label on `forwarder_errors_total`.
    pub fn error_type_label(&self) -> &'static str {
        match self {
            Self::SerializationFailed { .. } => "serialization",
            Self::TransportFailed { .. } => "transport",
            Self::RequestTimedOut { .. } => "timeout",
            Self::HttpClientBuild(_) => "client_build",
            Self::MetricsInstall(_) => "metrics_install",
            Self::Config(_) => "config",
        }
    }
}
