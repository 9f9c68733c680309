//! Forwarder configuration module
//!
//! Handles loading configuration from environment variables. The forwarder
//! itself only ever sees an explicit `ForwarderConfig` value.

use crate::error::ForwarderError;
use crate::events::{DEFAULT_MARKER_FIELD, IdPrecedence};
use reqwest::header::HeaderValue;
use std::env;
use std::fmt;
use std::time::Duration;

/// Forwarder configuration
#[derive(Clone)]
pub struct ForwarderConfig {
    /// API endpoint receiving forwarded payloads
    pub endpoint_url: String,

    /// Credential sent as `x-api-key`, if any
    pub api_key: Option<String>,

    /// Document field whose presence skips forwarding
    pub marker_field: String,

    /// Merge order for the `id` field
    pub id_precedence: IdPrecedence,

    /// Client timeout; `None` keeps the HTTP client default
    pub request_timeout: Option<Duration>,

    /// Ingress/health/metrics HTTP port
    pub http_port: u16,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl ForwarderConfig {
    /// Configuration with defaults for everything except the endpoint
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_key: None,
            marker_field: DEFAULT_MARKER_FIELD.to_string(),
            id_precedence: IdPrecedence::default(),
            request_timeout: None,
            http_port: 9090,
            log_level: "info".to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_marker_field(mut self, marker_field: impl Into<String>) -> Self {
        self.marker_field = marker_field.into();
        self
    }

    pub fn with_id_precedence(mut self, id_precedence: IdPrecedence) -> Self {
        self.id_precedence = id_precedence;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ForwarderError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ForwarderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_url = lookup("API_URL")
            .or_else(|| lookup("ENDPOINT_URL"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                ForwarderError::Config("API_URL or ENDPOINT_URL must be set".to_string())
            })?;

        if !endpoint_url.starts_with("http://") && !endpoint_url.starts_with("https://") {
            return Err(ForwarderError::Config(format!(
                "API_URL must be an http(s) URL, got '{endpoint_url}'"
            )));
        }

        // An empty key is treated as no key at all
        let api_key = lookup("API_KEY").filter(|key| !key.is_empty());
        if let Some(ref key) = api_key {
            HeaderValue::from_str(key).map_err(|_| {
                ForwarderError::Config("API_KEY is not a valid HTTP header value".to_string())
            })?;
        }

        let marker_field = lookup("MARKER_FIELD")
            .filter(|field| !field.is_empty())
            .unwrap_or_else(|| DEFAULT_MARKER_FIELD.to_string());

        let id_precedence = match lookup("ID_PRECEDENCE") {
            Some(value) => value
                .parse()
                .map_err(|e| ForwarderError::Config(format!("ID_PRECEDENCE is invalid: {e}")))?,
            None => IdPrecedence::default(),
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.parse().map_err(|e| {
                    ForwarderError::Config(format!(
                        "REQUEST_TIMEOUT_SECS must be a valid number: {e}"
                    ))
                })?;
                if secs == 0 {
                    return Err(ForwarderError::Config(
                        "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let http_port = lookup("HTTP_PORT")
            .unwrap_or_else(|| "9090".to_string())
            .parse()
            .map_err(|e| {
                ForwarderError::Config(format!("HTTP_PORT must be a valid port number: {e}"))
            })?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            endpoint_url,
            api_key,
            marker_field,
            id_precedence,
            request_timeout,
            http_port,
            log_level,
        })
    }

    /// True if requests carry the `x-api-key` header
    pub fn is_credentialed(&self) -> bool {
        self.api_key.is_some()
    }
}

// Never print the credential
impl fmt::Debug for ForwarderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwarderConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("marker_field", &self.marker_field)
            .field("id_precedence", &self.id_precedence)
            .field("request_timeout", &self.request_timeout)
            .field("http_port", &self.http_port)
            .field("log_level", &self.log_level)
            .finish()
    }
}
