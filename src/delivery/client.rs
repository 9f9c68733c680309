//! HTTP client for the API endpoint
//!
//! Performs the single outbound POST per change event and returns an explicit
//! result instead of raising. Status codes are reported, not judged: the
//! forwarder decides what a non-2xx response means.

use crate::config::ForwarderConfig;
use crate::error::ForwarderError;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Header carrying the API key credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Response bodies beyond this size are truncated before logging
const MAX_RESPONSE_BODY_SIZE: usize = 64 * 1024;

/// Appended to a response body cut at `MAX_RESPONSE_BODY_SIZE`
const TRUNCATION_SUFFIX: &str = "... (truncated)";

/// Response from the API endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text (capped)
    pub body: String,
    /// Round-trip duration
    pub duration: Duration,
}

impl ApiResponse {
    /// True for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound collaborator that delivers a serialized payload
///
/// Implementations own the endpoint and credential; callers only hand over
/// the JSON body.
pub trait ApiClient: Send + Sync {
    /// Endpoint the client posts to
    fn endpoint(&self) -> &str;

    /// POST `body` as `application/json`
    fn post_json(
        &self,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<ApiResponse, ForwarderError>> + Send;
}

/// `reqwest`-backed API client
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiClient {
    /// Build a client from the forwarder configuration
    pub fn new(config: &ForwarderConfig) -> Result<Self, ForwarderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ForwarderError::HttpClientBuild(Box::new(e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> ForwarderError {
        if error.is_timeout() {
            return ForwarderError::RequestTimedOut {
                endpoint: self.endpoint.clone(),
                timeout_ms: self.timeout.map_or(0, |t| t.as_millis() as u64),
            };
        }

        ForwarderError::TransportFailed {
            endpoint: self.endpoint.clone(),
            source: Box::new(error),
        }
    }
}

impl ApiClient for HttpApiClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_json(&self, body: Vec<u8>) -> Result<ApiResponse, ForwarderError> {
        let start = Instant::now();

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(ref api_key) = self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    endpoint = %self.endpoint,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Request failed"
                );
                return Err(self.map_send_error(e));
            }
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(bytes) if bytes.len() > MAX_RESPONSE_BODY_SIZE => {
                let truncated = String::from_utf8_lossy(&bytes[..MAX_RESPONSE_BODY_SIZE]);
                format!("{truncated}{TRUNCATION_SUFFIX}")
            }
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(error = %e, "Failed to read response body");
                format!("[failed to read response body: {e}]")
            }
        };

        let duration = start.elapsed();
        debug!(status, duration_ms = duration.as_millis() as u64, "Received response");

        Ok(ApiResponse {
            status,
            body,
            duration,
        })
    }
}
