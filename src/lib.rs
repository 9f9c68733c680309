//! Document change forwarder
//!
//! Receives document change events from a database eventing platform and,
//! unless the document already carries the marker field, forwards it with its
//! identifier to an external API endpoint as a single JSON POST.
//!
//! - `config`: environment-driven `ForwarderConfig`
//! - `error`: `ForwarderError` taxonomy
//! - `events`: change event model and payload merge
//! - `delivery`: outbound API client
//! - `forwarder`: the per-event decision and call
//! - `http`: ingress, health, readiness and metrics endpoints
//! - `metrics`: Prometheus counters and exporter

pub mod config;
pub mod delivery;
pub mod error;
pub mod events;
pub mod forwarder;
pub mod http;
pub mod metrics;

pub use config::ForwarderConfig;
pub use delivery::{ApiClient, ApiResponse, HttpApiClient};
pub use error::ForwarderError;
pub use events::{ChangeEvent, ForwardPayload, IdPrecedence};
pub use forwarder::{EventForwarder, ForwardOutcome};
