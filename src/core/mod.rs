//! Core primitives.
//!
//! Pure functions with no I/O. Everything here is deterministic and can be
//! checked against the server's own implementation byte-for-byte.

pub mod auth_key;

pub use auth_key::{derive_auth_key, AuthKey, AUTH_KEY_HEX_LEN};
