//! HTTP client abstraction for testability

use super::ClientError;
use std::time::Duration;
use tracing::{debug, trace};

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for synchronous HTTP client operations.
///
/// Lets the resolution client run against a scripted mock in tests.
/// Implementations report any status code as a response; only failures to
/// obtain a response at all are errors.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP POST request with a JSON body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Slice of (header_name, header_value) tuples
    /// * `json_body` - JSON body as a string
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json_body: &str,
    ) -> Result<HttpResponse, ClientError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json_body: &str,
    ) -> Result<HttpResponse, ClientError> {
        trace!(url = %url, bytes = json_body.len(), "POST");

        let mut request = self.client.post(url).body(json_body.to_string());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .map_err(|e| ClientError::Transport(format!("POST request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ClientError::Transport(format!("Failed to read response: {}", e)))?;

        debug!(url = %url, status, bytes = body.len(), "POST completed");
        Ok(HttpResponse { status, body })
    }
}
