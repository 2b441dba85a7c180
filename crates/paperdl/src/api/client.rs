//! Unauthenticated client for the build-distribution API
//!
//! Every call is a single GET. The body is read in full, then decoded into
//! the matching record from [`super::models`]. Non-success statuses surface as
//! [`Error::Api`] with the server's `{"error": ...}` message when it sent one.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{BuildInfo, ProjectInfo, ProjectList, VersionGroupInfo, VersionInfo};
use crate::config::ClientConfig;
use crate::core::{Error, Result};

/// The four lookups the resolver chains together
#[async_trait]
pub trait BuildApi: Send + Sync {
    async fn project(&self, project: &str) -> Result<ProjectInfo>;

    async fn version_group(&self, project: &str, group: &str) -> Result<VersionGroupInfo>;

    async fn version(&self, project: &str, version: &str) -> Result<VersionInfo>;

    async fn build(&self, project: &str, version: &str, build: &str) -> Result<BuildInfo>;
}

/// Error body the API sends with 4xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// HTTP client bound to one API root
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with its own HTTP connection pool
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config.build_client()?, &config.base_url)
    }

    /// Create a client on top of an existing HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| Error::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot have path segments appended".to_string(),
            });
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List every project the API serves
    pub async fn projects(&self) -> Result<ProjectList> {
        self.get_json(self.endpoint(&["projects"])?).await
    }

    /// URL of a build's downloadable file
    pub fn download_url(&self, project: &str, version: &str, build: &str, name: &str) -> Result<Url> {
        self.endpoint(&[
            "projects", project, "versions", version, "builds", build, "downloads", name,
        ])
    }

    /// Append percent-encoded path segments to the API root.
    ///
    /// Empty, `.` and `..` segments would be dropped or collapsed by URL
    /// normalization, so they are rejected instead of silently changing the
    /// endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidUrl {
                url: format!("{}/{}", self.base_url, segments.join("/")),
                reason: format!("path segment {:?} is not allowed", bad),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot have path segments appended".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let url_str = url.to_string();
        debug!("API request: GET {}", url_str);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(&url_str, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(&url_str, e))?;

        debug!("API response: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(Error::Api {
                url: url_str,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Decode {
            url: url_str,
            source: e,
        })
    }
}

#[async_trait]
impl BuildApi for ApiClient {
    async fn project(&self, project: &str) -> Result<ProjectInfo> {
        self.get_json(self.endpoint(&["projects", project])?).await
    }

    async fn version_group(&self, project: &str, group: &str) -> Result<VersionGroupInfo> {
        self.get_json(self.endpoint(&["projects", project, "version_group", group])?)
            .await
    }

    async fn version(&self, project: &str, version: &str) -> Result<VersionInfo> {
        self.get_json(self.endpoint(&["projects", project, "versions", version])?)
            .await
    }

    async fn build(&self, project: &str, version: &str, build: &str) -> Result<BuildInfo> {
        self.get_json(self.endpoint(&["projects", project, "versions", version, "builds", build])?)
            .await
    }
}
