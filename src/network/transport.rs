//! HTTP Transport
//!
//! The one capability the client needs from the network: send a GET with
//! query parameters and hand back status and body. Kept behind a trait so
//! callers (and tests) can swap in their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, trace};

use super::config::ConfigError;

/// Raw response of a single call. Parsed immediately by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failures below the HTTP layer: nothing usable came back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, reset, ...
    #[error("connection failed: {0}")]
    Unreachable(String),
    /// No complete response within the timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Headers arrived but the body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Send a GET request with query parameters.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `GET url?query` and return status and body.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        debug!(timeout_ms = %timeout.as_millis(), "http transport initialized");

        Ok(Self { client, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<TransportResponse, TransportError> {
        trace!(url = %url, params = query.len(), "sending GET request");

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        debug!(status = %status, body_len = body.len(), "received response");

        Ok(TransportResponse { status, body })
    }
}

// =============================================================================
// TESTS
// =============================================================================
