//! Client Configuration
//!
//! Connection settings for a [`RemoteCommandClient`](super::client::RemoteCommandClient).
//! Validated once at construction and read-only afterwards.

use std::fmt;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Default control API host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default control API port.
pub const DEFAULT_PORT: u16 = 20059;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// API version segment of the base path.
pub const API_PATH: &str = "api/2/";

/// Path of the call endpoint, relative to the base URL.
pub const CALL_PATH: &str = "call";

/// Client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server host name or IP address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// API user name.
    pub username: String,
    /// API password (shared secret for key derivation).
    pub password: String,
    /// Upper bound on a single call, connect included.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Config for the default host and port with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host as it appears in a URL; IPv6 literals are bracketed.
    fn url_host(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }

    /// Base endpoint, e.g. `http://127.0.0.1:20059/api/2/`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/{}", self.url_host(), self.port, API_PATH)
    }

    /// Full URL of the call endpoint (without query string).
    pub fn call_url(&self) -> String {
        format!("{}{}", self.base_url(), CALL_PATH)
    }

    /// The host must land in the authority of the call URL and nowhere else.
    fn check_call_url(&self) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidHost(self.host.clone());
        let url = Url::parse(&self.call_url()).map_err(|_| invalid())?;

        let well_formed = url.username().is_empty()
            && url.password().is_none()
            && url.port_or_known_default() == Some(self.port)
            && url.path() == format!("/{}{}", API_PATH, CALL_PATH)
            && url.query().is_none()
            && url.fragment().is_none();

        if well_formed {
            Ok(())
        } else {
            Err(invalid())
        }
    }

    /// Reject configurations that can never produce a valid call.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.check_call_url()?;
        if self.username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Configuration errors, raised at construction time only.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Host is empty or whitespace.
    #[error("host must not be empty")]
    EmptyHost,
    /// Host cannot form a valid call URL.
    #[error("invalid host: {0:?}")]
    InvalidHost(String),
    /// Port 0 is not connectable.
    #[error("port must be non-zero")]
    InvalidPort,
    /// Username is empty.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// A zero timeout would fail every call.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 20059);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.base_url(), "http://127.0.0.1:20059/api/2/");
        assert_eq!(config.call_url(), "http://127.0.0.1:20059/api/2/call");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("bot", "secret")
            .with_host("mc.example.org")
            .with_port(25580)
            .with_timeout(Duration::from_millis(500));

        assert_eq!(config.base_url(), "http://mc.example.org:25580/api/2/");
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_has_no_credentials() {
        let result = ClientConfig::default().validate();
        assert!(matches!(result, Err(ConfigError::EmptyUsername)));
    }

    #[test]
    fn test_validation_failures() {
        let base = ClientConfig::new("bot", "secret");

        let config = base.clone().with_host("  ");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyHost)));

        let config = base.clone().with_port(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));

        let config = ClientConfig::new("bot", "");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPassword)));

        let config = base.with_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let config = ClientConfig::new("bot", "secret").with_host("::1");
        assert_eq!(config.base_url(), "http://[::1]:20059/api/2/");
        assert!(config.validate().is_ok());

        let config = ClientConfig::new("bot", "secret").with_host("[::1]");
        assert_eq!(config.call_url(), "http://[::1]:20059/api/2/call");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_hosts_rejected() {
        for host in ["bad host", "a/b", "user@host", "host?x=1", "host#frag", "host:8080"] {
            let config = ClientConfig::new("bot", "secret").with_host(host);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidHost(ref h)) if h == host),
                "host {:?} accepted",
                host
            );
        }
    }

    #[test]
    fn test_hostnames_accepted() {
        for host in ["localhost", "mc.example.org", "MC.Example.org", "10.0.0.7"] {
            let config = ClientConfig::new("bot", "secret").with_host(host);
            assert!(config.validate().is_ok(), "host {:?} rejected", host);
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::new("bot", "hunter2");
        let debug = format!("{:?}", config);
        assert!(debug.contains("bot"));
        assert!(!debug.contains("hunter2"));
    }
}
