//! Streaming artifact download
//!
//! The response body is written chunk by chunk as it arrives, so memory use
//! stays flat regardless of artifact size. Bytes are hashed on the way
//! through; checking that digest is up to the caller.

use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::core::{Error, FileOperation, ProgressCallback, ProgressEvent, Result};

/// What landed on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub bytes_written: u64,
    /// Lowercase hex SHA-256 of the written bytes
    pub sha256: String,
}

/// Downloads one URL to one file
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` into `dest_path`, creating or truncating it.
    ///
    /// The destination is only touched once the server has answered with a
    /// success status.
    pub async fn fetch_to_file(
        &self,
        url: &Url,
        dest_path: &Path,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<FetchOutcome> {
        let url_str = url.to_string();
        debug!("Stream downloading: {} to {}", url_str, dest_path.display());

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                url: url_str,
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown error").to_string(),
            });
        }

        let total_size = response.content_length();
        debug!("Content length: {:?}", total_size);

        if let Some(ref callback) = progress_callback {
            callback(ProgressEvent::DownloadStarted {
                url: url_str.clone(),
                total_size,
            });
        }

        let mut file = fs::File::create(dest_path)
            .await
            .map_err(|e| Error::FileSystem {
                path: dest_path.to_path_buf(),
                operation: FileOperation::Create,
                source: e,
            })?;

        let mut stream = response.bytes_stream();
        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;
        let start_time = Instant::now();
        let mut last_progress_time = start_time;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| Error::transport(&url_str, e))?;

            file.write_all(&chunk)
                .await
                .map_err(|e| Error::FileSystem {
                    path: dest_path.to_path_buf(),
                    operation: FileOperation::Write,
                    source: e,
                })?;

            hasher.update(&chunk);
            downloaded += chunk.len() as u64;

            // Report progress at most every 100ms
            let now = Instant::now();
            if now.duration_since(last_progress_time).as_millis() >= 100 {
                if let Some(ref callback) = progress_callback {
                    let elapsed = start_time.elapsed().as_secs_f64();
                    let speed = if elapsed > 0.0 { downloaded as f64 / elapsed } else { 0.0 };

                    callback(ProgressEvent::DownloadProgress {
                        url: url_str.clone(),
                        downloaded,
                        total: total_size,
                        speed_bps: speed,
                    });
                }
                last_progress_time = now;
            }
        }

        file.flush().await.map_err(|e| Error::FileSystem {
            path: dest_path.to_path_buf(),
            operation: FileOperation::Write,
            source: e,
        })?;

        if let Some(ref callback) = progress_callback {
            callback(ProgressEvent::DownloadComplete {
                url: url_str,
                final_size: downloaded,
            });
        }

        debug!("Stream download completed: {} bytes", downloaded);
        Ok(FetchOutcome {
            bytes_written: downloaded,
            sha256: hex::encode(hasher.finalize()),
        })
    }
}
