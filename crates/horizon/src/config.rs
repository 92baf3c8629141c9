//! Client configuration: where the service lives and how long to wait for it.
//!
//! Credentials are configured separately through [`tasks::Credentials`].

use std::time::Duration;

use reqwest::Url;
use tasks::{HorizonError, HorizonResult};
use thiserror::Error;

/// Default Horizon service URL.
pub const DEFAULT_BASE_URL: &str = "https://api.gethorizon.ai";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV_VAR: &str = "HORIZON_BASE_URL";

/// Environment variable setting a per-request timeout in whole seconds.
pub const TIMEOUT_ENV_VAR: &str = "HORIZON_TIMEOUT_SECS";

/// Version of this crate, used in the User-Agent header.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Problems found while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL does not parse, is not http(s), or has no host.
    #[error("HORIZON_BASE_URL must be an http(s) URL, got '{0}'")]
    InvalidBaseUrl(String),

    /// The timeout is not a non-negative integer.
    #[error("HORIZON_TIMEOUT_SECS must be a whole number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

impl From<ConfigError> for HorizonError {
    fn from(err: ConfigError) -> Self {
        HorizonError::invalid_argument(err.to_string())
    }
}

/// Connection settings for a [`crate::TaskClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    request_timeout: Option<Duration>,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            user_agent: format!("horizon-client/{VERSION}"),
        }
    }
}

impl ClientConfig {
    /// Default configuration: production URL, no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads [`BASE_URL_ENV_VAR`] and [`TIMEOUT_ENV_VAR`], falling back to
    /// defaults for unset variables.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] if a set variable cannot be parsed.
    pub fn from_env() -> HorizonResult<Self> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.try_with_base_url(url)?;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Points the client at another service URL.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBaseUrl`] unless the URL parses as an `http` or
    /// `https` URL with a host.
    pub fn try_with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = base_url.into();
        let trimmed = url.trim().trim_end_matches('/');
        let parsed = match Url::parse(trimmed) {
            Ok(parsed) => parsed,
            Err(_) => return Err(ConfigError::InvalidBaseUrl(url)),
        };
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(url));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Caps each request at `timeout`, connection included.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Overrides the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Joins `path` (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url(), "https://api.gethorizon.ai");
        assert_eq!(config.request_timeout(), None);
        assert!(config.user_agent().starts_with("horizon-client/"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new()
            .try_with_base_url("http://localhost:8000/")
            .unwrap();
        assert_eq!(config.endpoint("/api/tasks"), "http://localhost:8000/api/tasks");
    }

    #[test]
    fn test_base_url_requires_scheme() {
        let err = ClientConfig::new()
            .try_with_base_url("api.gethorizon.ai")
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("api.gethorizon.ai".to_string()));
    }

    #[test]
    fn test_base_url_rejects_unparseable_host() {
        let err = ClientConfig::new()
            .try_with_base_url("http://not a host")
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("http://not a host".to_string()));
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        for url in ["ftp://api.gethorizon.ai", "file:///tmp/horizon", "http://"] {
            let err = ClientConfig::new().try_with_base_url(url).unwrap_err();
            assert_eq!(err, ConfigError::InvalidBaseUrl(url.to_string()));
        }
    }

    #[test]
    fn test_from_lookup_rejects_malformed_base_url() {
        let err = ClientConfig::from_lookup(|name| {
            (name == BASE_URL_ENV_VAR).then(|| "https://bad host".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = ClientConfig::from_lookup(|name| match name {
            BASE_URL_ENV_VAR => Some("http://127.0.0.1:5000".to_string()),
            TIMEOUT_ENV_VAR => Some("30".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(|name| {
            (name == TIMEOUT_ENV_VAR).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".to_string()));
    }

    #[test]
    fn test_config_error_becomes_invalid_argument() {
        let err: HorizonError = ConfigError::InvalidTimeout("x".to_string()).into();
        assert!(matches!(err, HorizonError::InvalidArgument { .. }));
    }
}
