//! Protocol Messages
//!
//! Wire format of the `/api/2/call` endpoint.
//!
//! Requests are a JSON envelope carried whole inside the `json` query
//! parameter. Responses are a JSON array whose first element holds the
//! result under `success`:
//!
//! ```text
//! GET /api/2/call?json={"name":"say","arguments":["hi"],"key":"<hex>","username":"bot"}
//! 200 [{"result":"success","source":"say","success":true}]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::auth_key::{derive_auth_key, AuthKey};

/// Name of the query parameter carrying the envelope.
pub const ENVELOPE_PARAM: &str = "json";

/// Key of the result value inside the first response element.
pub const SUCCESS_FIELD: &str = "success";

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// Signed call envelope. Built fresh for each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Remote command name.
    pub name: String,
    /// Positional arguments, order-significant.
    pub arguments: Vec<Value>,
    /// Hex SHA-256 of `username + name + password`.
    pub key: AuthKey,
    /// API user name.
    pub username: String,
}

impl CommandRequest {
    /// Build and sign an envelope for `name`.
    pub fn signed(name: &str, arguments: Vec<Value>, username: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments,
            key: derive_auth_key(username, name, password),
            username: username.to_string(),
        }
    }

    /// Compact JSON form used as the query value.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Query pairs for the GET request.
    pub fn to_query(&self) -> Result<[(&'static str, String); 1], serde_json::Error> {
        Ok([(ENVELOPE_PARAM, self.to_json()?)])
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Reasons a response body does not match `[{ "success": ... }, ...]`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Top-level value is not an array.
    #[error("response is not a JSON array")]
    NotAnArray,
    /// Array has no elements.
    #[error("response array is empty")]
    EmptyArray,
    /// First element is not an object.
    #[error("first response element is not an object")]
    FirstElementNotObject,
    /// First element lacks the `success` key.
    #[error("first response element has no `success` field")]
    MissingSuccess,
    /// `success` value does not fit the requested type.
    #[error("`success` value has unexpected shape: {0}")]
    UnexpectedType(String),
}

/// Extract the `success` value from a response body.
///
/// Only the first element is inspected; trailing elements and sibling keys
/// are ignored. A present `success: null` is returned as `Value::Null`.
pub fn decode_success(body: &str) -> Result<Value, DecodeError> {
    let decoded: Value = serde_json::from_str(body)?;

    let mut elements = match decoded {
        Value::Array(elements) => elements,
        _ => return Err(DecodeError::NotAnArray),
    };
    if elements.is_empty() {
        return Err(DecodeError::EmptyArray);
    }

    match elements.swap_remove(0) {
        Value::Object(mut first) => first
            .remove(SUCCESS_FIELD)
            .ok_or(DecodeError::MissingSuccess),
        _ => Err(DecodeError::FirstElementNotObject),
    }
}

// =============================================================================
// TESTS
// =============================================================================
