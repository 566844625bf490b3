//! Per-call Authentication Keys
//!
//! The control API authenticates every call with a shared-secret digest:
//!
//! ```text
//! key = hex(SHA-256(username || command || password))
//! ```
//!
//! The command name is part of the preimage, so a key is only valid for the
//! command it was derived for and must be recomputed on every call.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded key (32 bytes -> 64 chars).
pub const AUTH_KEY_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest binding a user, a command, and a password.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthKey(String);

impl AuthKey {
    /// Hex string as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the hex string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AuthKey {
    // Only a prefix; the full key is a valid credential for one command.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthKey({}..)", &self.0[..8])
    }
}

impl Serialize for AuthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AuthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        let well_formed = hex.len() == AUTH_KEY_HEX_LEN
            && hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(de::Error::custom("auth key must be 64 lowercase hex characters"));
        }
        Ok(AuthKey(hex))
    }
}

/// Derive the key for `command` on behalf of `username`.
///
/// The three parts are concatenated with no separator, matching the server's
/// own check byte-for-byte.
pub fn derive_auth_key(username: &str, command: &str, password: &str) -> AuthKey {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(command.as_bytes());
    hasher.update(password.as_bytes());
    AuthKey(hex::encode(hasher.finalize()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_digest() {
        // sha256("botsaysecret")
        let key = derive_auth_key("bot", "say", "secret");
        let expected = hex::encode(Sha256::digest(b"botsaysecret"));
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_empty_preimage_digest() {
        let key = derive_auth_key("", "", "");
        assert_eq!(
            key.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_key_is_lowercase_hex() {
        let key = derive_auth_key("admin", "players.online.count", "hunter2");
        assert_eq!(key.as_str().len(), AUTH_KEY_HEX_LEN);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_command_changes_key() {
        let a = derive_auth_key("bot", "say", "secret");
        let b = derive_auth_key("bot", "broadcast", "secret");
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_does_not_leak_full_key() {
        let key = derive_auth_key("bot", "say", "secret");
        let debug = format!("{:?}", key);
        assert!(!debug.contains(key.as_str()));
        assert!(debug.starts_with("AuthKey("));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = derive_auth_key("bot", "say", "secret");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key));
    }

    #[test]
    fn test_deserialize_accepts_derived_key() {
        let key = derive_auth_key("bot", "say", "secret");
        let json = serde_json::to_string(&key).unwrap();
        let parsed: AuthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_deserialize_rejects_malformed_key() {
        let upper = derive_auth_key("bot", "say", "secret").as_str().to_uppercase();
        let upper_json = format!("\"{}\"", upper);
        for bad in ["\"\"", "\"abc\"", "42", upper_json.as_str()] {
            assert!(serde_json::from_str::<AuthKey>(bad).is_err(), "accepted {}", bad);
        }
    }

    proptest! {
        #[test]
        fn prop_derivation_is_deterministic(
            user in ".{0,16}",
            cmd in ".{0,16}",
            pass in ".{0,16}",
        ) {
            let first = derive_auth_key(&user, &cmd, &pass);
            let second = derive_auth_key(&user, &cmd, &pass);
            prop_assert_eq!(first.as_str().len(), AUTH_KEY_HEX_LEN);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_distinct_commands_distinct_keys(
            cmd_a in "[a-z.]{1,24}",
            cmd_b in "[a-z.]{1,24}",
        ) {
            prop_assume!(cmd_a != cmd_b);
            let a = derive_auth_key("bot", &cmd_a, "secret");
            let b = derive_auth_key("bot", &cmd_b, "secret");
            prop_assert_ne!(a, b);
        }
    }
}
