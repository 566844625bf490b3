//! # mcapi
//!
//! Signed remote-command client for the game-server control API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MCAPI CLIENT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Pure primitives                           │
//! │  └── auth_key.rs - SHA-256 per-call authentication key       │
//! │                                                              │
//! │  network/        - HTTP (non-deterministic)                  │
//! │  ├── config.rs   - Host, port, credentials, timeout          │
//! │  ├── protocol.rs - Call envelope and response decoding       │
//! │  ├── transport.rs- GET-with-query capability (reqwest)       │
//! │  └── client.rs   - RemoteCommandClient, error taxonomy       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use mcapi::{ClientConfig, RemoteCommandClient};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RemoteCommandClient::new(ClientConfig::new("admin", "changeme"))?;
//! let said = client.call("chat.broadcast", vec![json!("Restart in 5 minutes")]).await?;
//! println!("{}", said);
//! # Ok(())
//! # }
//! ```
//!
//! ## Call Outcomes
//!
//! Every call ends in exactly one of:
//! - the `success` value of the first response element,
//! - [`CallError::ServerUnreachable`] (code 503) when nothing came back,
//! - [`CallError::RemoteCallFailed`] carrying the HTTP status (>= 400),
//! - [`CallError::ResponseDecodeFailed`] when the body has the wrong shape.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod network;

// Re-export commonly used types
pub use crate::core::auth_key::{derive_auth_key, AuthKey};
pub use crate::network::client::{CallError, RemoteCommandClient};
pub use crate::network::config::{ClientConfig, ConfigError};
pub use crate::network::protocol::{CommandRequest, DecodeError};
pub use crate::network::transport::{HttpTransport, Transport, TransportError, TransportResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
