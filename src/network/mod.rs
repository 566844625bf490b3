//! Network Layer
//!
//! HTTP client for the game-server control API.
//! All I/O lives here; key derivation runs through `core/`.

pub mod client;
pub mod config;
pub mod protocol;
pub mod transport;

pub use client::{CallError, RemoteCommandClient, SERVICE_UNAVAILABLE};
pub use config::{ClientConfig, ConfigError, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use protocol::{decode_success, CommandRequest, DecodeError};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
