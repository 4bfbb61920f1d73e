//! Configuration types for the background removal client

use crate::error::{ClientError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server the client talks to when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// How long an error banner stays visible before it dismisses itself
pub const DEFAULT_ERROR_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Configuration for the workflow client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the background removal service
    pub server_url: String,

    /// Error banner auto-dismiss interval
    pub error_dismiss_after: Duration,

    /// Per-request timeout (None = rely on the transport's own timeouts)
    pub request_timeout: Option<Duration>,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            error_dismiss_after: DEFAULT_ERROR_DISMISS_AFTER,
            request_timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder for fluent API construction
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bgremove_client::ClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::builder()
    ///     .server_url("http://localhost:8080")
    ///     .request_timeout(Duration::from_secs(60))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.server_url, "http://localhost:8080");
    /// ```
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Server URL: parses as an absolute `http` or `https` URL
    /// - Error dismiss interval: non-zero
    /// - Request timeout: non-zero when set
    ///
    /// # Errors
    /// - Unparseable server URL or unsupported scheme
    /// - Zero-length dismiss interval or timeout
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.error_dismiss_after.is_zero() {
            return Err(ClientError::config_value_error(
                "error dismiss interval",
                "0s",
                "a non-zero duration",
            ));
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::config_value_error(
                "request timeout",
                "0s",
                "a non-zero duration or none",
            ));
        }

        Ok(())
    }

    /// Parse the configured server URL
    ///
    /// # Errors
    /// - Unparseable server URL or unsupported scheme
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.server_url).map_err(|e| {
            ClientError::invalid_config(format!("Invalid server URL '{}': {}", self.server_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::config_value_error(
                "server URL scheme",
                other,
                "http or https",
            )),
        }
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the service base URL
    #[must_use]
    pub fn server_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.server_url = url.into();
        self
    }

    /// Set the error banner auto-dismiss interval
    #[must_use]
    pub fn error_dismiss_after(mut self, interval: Duration) -> Self {
        self.config.error_dismiss_after = interval;
        self
    }

    /// Set a per-request timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Any rule checked by [`ClientConfig::validate`]
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.error_dismiss_after, Duration::from_secs(5));
        assert!(config.request_timeout.is_none());
        assert!(config.user_agent.starts_with("bgremove-client/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = ClientConfig::builder()
            .server_url("https://bg.example.com")
            .error_dismiss_after(Duration::from_secs(2))
            .request_timeout(Duration::from_secs(30))
            .user_agent("test-agent")
            .build()
            .unwrap();

        assert_eq!(config.server_url, "https://bg.example.com");
        assert_eq!(config.error_dismiss_after, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_invalid_server_urls() {
        let invalid_urls = vec!["", "not a url", "ftp://files.example.com", "/relative/path"];

        for url in invalid_urls {
            let result = ClientConfig::builder().server_url(url).build();
            assert!(result.is_err(), "URL should be rejected: {}", url);
        }

        let err = ClientConfig::builder()
            .server_url("ftp://files.example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_zero_durations_rejected() {
        let err = ClientConfig::builder()
            .error_dismiss_after(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("error dismiss interval"));

        let err = ClientConfig::builder()
            .request_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("request timeout"));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ClientConfig::builder()
            .request_timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
