//! Configuration for the API client and fetcher

use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::core::{Error, Result};

/// Public PaperMC v2 API
pub const DEFAULT_BASE_URL: &str = "https://api.papermc.io/v2";

/// Path segment of the API version served under a bare host
pub const API_VERSION: &str = "v2";

/// Turn a bare host such as `https://api.papermc.io` into the v2 API root.
///
/// URLs that already carry a path are returned unchanged, as are strings that
/// do not parse; those fail later with [`Error::InvalidUrl`].
pub fn api_root(base_url: &str) -> String {
    match Url::parse(base_url) {
        Ok(mut url) if url.path() == "/" && !url.cannot_be_a_base() => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.clear().push(API_VERSION);
            }
            url.to_string()
        }
        _ => base_url.to_string(),
    }
}

/// Configuration shared by every request of a run
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it
    pub base_url: String,
    pub user_agent: String,
    /// Whole-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the HTTP client used for both metadata and artifact requests
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| Error::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("paperdl/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("paperdl/"));
    }

    #[test]
    fn test_builders_override_fields() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn test_api_root_appends_version_to_bare_host() {
        assert_eq!(api_root("https://api.papermc.io"), "https://api.papermc.io/v2");
        assert_eq!(api_root("https://api.papermc.io/"), "https://api.papermc.io/v2");
        assert_eq!(api_root("http://127.0.0.1:8080"), "http://127.0.0.1:8080/v2");
    }

    #[test]
    fn test_api_root_keeps_explicit_paths() {
        assert_eq!(api_root(DEFAULT_BASE_URL), DEFAULT_BASE_URL);
        assert_eq!(api_root("https://mirror.example/papermc/v2"), "https://mirror.example/papermc/v2");
        assert_eq!(api_root("not a url"), "not a url");
    }
}
