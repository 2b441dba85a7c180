//! paperdl
//!
//! Client library for the PaperMC build-distribution API. It resolves
//! "latest" selectors for a project's version group, version and build, then
//! streams the chosen build artifact to a local file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paperdl::{ClientConfig, DownloadRequest, Downloader, Selector};
//!
//! # async fn example() -> paperdl::Result<()> {
//! let downloader = Downloader::new(&ClientConfig::default())?;
//!
//! // Latest build of the newest 1.18 release, saved under its own file name
//! let request = DownloadRequest::new("paper")
//!     .with_group(Selector::explicit("1.18"))
//!     .with_checksum_verification(true);
//!
//! let report = downloader.download(&request, None).await?;
//! println!("{} ({} bytes)", report.resolution.output.display(), report.bytes_written);
//! # Ok(())
//! # }
//! ```
//!
//! Every step is awaited before the next one starts; a failure anywhere
//! aborts the run and nothing is retried.

pub mod api;
pub mod config;
pub mod core;
pub mod downloader;
pub mod fetcher;
pub mod resolver;

pub use api::{ApiClient, BuildApi, BuildInfo, Download, ProjectList};
pub use config::ClientConfig;
pub use crate::core::{
    ConsoleProgressReporter, Error, FileOperation, IntoProgressCallback, ListKind,
    ProgressCallback, ProgressEvent, ProgressReporter, Result,
};
pub use downloader::{DownloadReport, Downloader};
pub use fetcher::{FetchOutcome, Fetcher};
pub use resolver::{
    DownloadRequest, LATEST, OutputTarget, Resolution, ResolvedBuild, Resolver, SOURCE_NAME,
    Selector,
};
