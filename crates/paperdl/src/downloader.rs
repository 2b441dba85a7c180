//! Main entry point: resolve a request, then fetch the artifact
//!
//! The call chain flows as follows:
//!
//! Downloader::download
//! ↓
//! Resolver (group → version → build → build record)
//! ↓
//! Fetcher (stream to disk)
//! ↓
//! optional SHA-256 check

use std::path::Path;
use tracing::info;

use crate::api::{ApiClient, BuildInfo, ProjectList};
use crate::config::ClientConfig;
use crate::core::{Error, ProgressCallback, Result};
use crate::fetcher::Fetcher;
use crate::resolver::{DownloadRequest, Resolution, Resolver};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub resolution: Resolution,
    pub bytes_written: u64,
    /// Digest of the bytes written, lowercase hex
    pub sha256: String,
    /// `true` only when verification was requested and passed
    pub verified: bool,
}

/// Resolves and downloads build artifacts from one API root
pub struct Downloader {
    api: ApiClient,
    fetcher: Fetcher,
}

impl Downloader {
    /// Create a downloader whose API client and fetcher share one HTTP client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = config.build_client()?;
        let api = ApiClient::with_client(client.clone(), &config.base_url)?;
        let fetcher = Fetcher::with_client(client);
        Ok(Self { api, fetcher })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// List the projects the API serves
    pub async fn projects(&self) -> Result<ProjectList> {
        self.api.projects().await
    }

    /// Resolve a request down to its build record without downloading
    pub async fn build_info(&self, request: &DownloadRequest) -> Result<BuildInfo> {
        let resolved = Resolver::new(&self.api).resolve_build(request).await?;
        Ok(resolved.info)
    }

    /// Resolve the request and download the selected artifact.
    ///
    /// Any failure aborts the run; the download is never issued if a
    /// metadata lookup failed.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<DownloadReport> {
        let resolution = Resolver::new(&self.api).resolve(request).await?;

        let url = self.api.download_url(
            &resolution.project,
            &resolution.version,
            &resolution.build,
            &resolution.artifact.name,
        )?;

        let outcome = self
            .fetcher
            .fetch_to_file(&url, &resolution.output, progress_callback)
            .await?;

        if request.verify_checksum {
            verify_sha256(&resolution.output, &resolution.artifact.sha256, &outcome.sha256)?;
        }

        info!(
            "Wrote {} bytes to {}",
            outcome.bytes_written,
            resolution.output.display()
        );

        Ok(DownloadReport {
            resolution,
            bytes_written: outcome.bytes_written,
            sha256: outcome.sha256,
            verified: request.verify_checksum,
        })
    }
}

fn verify_sha256(file: &Path, expected: &str, actual: &str) -> Result<()> {
    if expected.eq_ignore_ascii_case(actual) {
        return Ok(());
    }

    Err(Error::ChecksumMismatch {
        file: file.to_path_buf(),
        expected: expected.to_lowercase(),
        actual: actual.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_verify_is_case_insensitive() {
        let file = PathBuf::from("paper.jar");
        assert!(verify_sha256(&file, "ABCDEF01", "abcdef01").is_ok());

        let err = verify_sha256(&file, "abcdef01", "abcdef02").unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }
}
