//! Remote Command Client
//!
//! Signs a command, sends it to the control API, and classifies the single
//! response into one of three outcomes:
//!
//! ```text
//! transport failure      -> CallError::ServerUnreachable     (503)
//! HTTP status >= 400     -> CallError::RemoteCallFailed      (status)
//! body not [{success}]   -> CallError::ResponseDecodeFailed
//! otherwise              -> Ok(success value)
//! ```
//!
//! Each call is one request. Nothing is retried or cached.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use super::config::{ClientConfig, ConfigError};
use super::protocol::{decode_success, CommandRequest, DecodeError};
use super::transport::{HttpTransport, Transport, TransportError};

/// Status code reported for an unreachable server.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Call errors.
#[derive(Debug, Error)]
pub enum CallError {
    /// The request never produced a response.
    #[error("server is offline")]
    ServerUnreachable(#[source] TransportError),

    /// The server answered with an error status.
    #[error("call to remote server failed with status {status}")]
    RemoteCallFailed {
        /// HTTP status code.
        status: u16,
    },

    /// The body is not a `[{ "success": ... }]` document.
    #[error("cannot decode response of remote server: {0}")]
    ResponseDecodeFailed(#[from] DecodeError),

    /// Command name is empty.
    #[error("command name must not be empty")]
    InvalidCommand,

    /// The envelope could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CallError {
    /// Status-like code for callers that report numerically.
    pub fn code(&self) -> Option<u16> {
        match self {
            CallError::ServerUnreachable(_) => Some(SERVICE_UNAVAILABLE),
            CallError::RemoteCallFailed { status } => Some(*status),
            _ => None,
        }
    }

    /// True when the server could not be reached at all.
    pub fn is_server_offline(&self) -> bool {
        matches!(self, CallError::ServerUnreachable(_))
    }
}

impl From<TransportError> for CallError {
    fn from(err: TransportError) -> Self {
        CallError::ServerUnreachable(err)
    }
}

/// Client for the `/api/2/call` endpoint.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct RemoteCommandClient {
    config: Arc<ClientConfig>,
    call_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RemoteCommandClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCommandClient")
            .field("config", &self.config)
            .field("call_url", &self.call_url)
            .finish_non_exhaustive()
    }
}

impl RemoteCommandClient {
    /// Create a client backed by [`HttpTransport`].
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::build(config, Arc::new(transport)))
    }

    /// Create a client for `host:port` with the default timeout.
    pub fn connect(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            ClientConfig::new(username, password)
                .with_host(host)
                .with_port(port),
        )
    }

    /// Create a client that sends through `transport`.
    ///
    /// `config.timeout` bounds every call regardless of the transport.
    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Result<Self, ConfigError>
    where
        T: Transport + 'static,
    {
        config.validate()?;
        Ok(Self::build(config, Arc::new(transport)))
    }

    fn build(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let call_url = config.call_url();
        debug!(url = %call_url, username = %config.username, "remote command client ready");
        Self {
            config: Arc::new(config),
            call_url,
            transport,
        }
    }

    /// Connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the signed envelope for a call.
    fn envelope(&self, name: &str, arguments: Vec<Value>) -> CommandRequest {
        CommandRequest::signed(name, arguments, &self.config.username, &self.config.password)
    }

    /// Run `name` with positional `arguments` and return its `success` value.
    #[instrument(skip(self, arguments), fields(args = arguments.len()))]
    pub async fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value, CallError> {
        if name.is_empty() {
            return Err(CallError::InvalidCommand);
        }

        let request = self.envelope(name, arguments);
        let query = request.to_query().map_err(CallError::Encode)?;

        let timeout = self.config.timeout;
        let response = tokio::time::timeout(timeout, self.transport.get(&self.call_url, &query))
            .await
            .map_err(|_| {
                debug!(timeout_ms = %timeout.as_millis(), "remote call timed out");
                CallError::ServerUnreachable(TransportError::Timeout(timeout))
            })??;

        if response.status >= 400 {
            debug!(status = %response.status, "remote call rejected");
            return Err(CallError::RemoteCallFailed {
                status: response.status,
            });
        }

        let value = decode_success(&response.body)?;
        debug!(status = %response.status, "remote call succeeded");
        Ok(value)
    }

    /// [`call`](Self::call) with no arguments.
    pub async fn call_no_args(&self, name: &str) -> Result<Value, CallError> {
        self.call(name, Vec::new()).await
    }

    /// [`call`](Self::call), then deserialize the `success` value into `T`.
    pub async fn call_as<T>(&self, name: &str, arguments: Vec<Value>) -> Result<T, CallError>
    where
        T: DeserializeOwned,
    {
        let value = self.call(name, arguments).await?;
        serde_json::from_value(value)
            .map_err(|e| CallError::ResponseDecodeFailed(DecodeError::UnexpectedType(e.to_string())))
    }
}

// =============================================================================
// TESTS
// =============================================================================
