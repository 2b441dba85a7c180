//! Selector resolution
//!
//! Turns a [`DownloadRequest`] into concrete identifiers by walking the API
//! chain group → version → build → build record. Each lookup needs the value
//! resolved by the one before it, so the chain is strictly sequential and
//! stops at the first error.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::api::{APPLICATION_DOWNLOAD, BuildApi, BuildInfo, Download};
use crate::core::{Error, ListKind, Result};

/// Sentinel accepted for group, version and build
pub const LATEST: &str = "latest";

/// Sentinel output name meaning "use the artifact's own file name"
pub const SOURCE_NAME: &str = "source";

/// A group, version or build as the user asked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Latest,
    Explicit(String),
}

impl Selector {
    pub fn explicit<S: Into<String>>(value: S) -> Self {
        Selector::Explicit(value.into())
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        if value == LATEST {
            Selector::Latest
        } else {
            Selector::Explicit(value.to_string())
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Latest => write!(f, "{}", LATEST),
            Selector::Explicit(value) => write!(f, "{}", value),
        }
    }
}

/// Where the artifact should be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Use the file name the API reports for the artifact
    SourceName,
    Path(PathBuf),
}

impl From<&str> for OutputTarget {
    fn from(value: &str) -> Self {
        if value == SOURCE_NAME {
            OutputTarget::SourceName
        } else {
            OutputTarget::Path(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::SourceName => write!(f, "{}", SOURCE_NAME),
            OutputTarget::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything a run needs to know, as supplied by the user
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub project: String,
    pub group: Selector,
    pub version: Selector,
    pub build: Selector,
    pub output: OutputTarget,
    /// Key under the build record's `downloads` map
    pub download: String,
    /// Compare the streamed SHA-256 against the build record
    pub verify_checksum: bool,
}

impl DownloadRequest {
    pub fn new<S: Into<String>>(project: S) -> Self {
        Self {
            project: project.into(),
            group: Selector::Latest,
            version: Selector::Latest,
            build: Selector::Latest,
            output: OutputTarget::SourceName,
            download: APPLICATION_DOWNLOAD.to_string(),
            verify_checksum: false,
        }
    }

    pub fn with_group(mut self, group: Selector) -> Self {
        self.group = group;
        self
    }

    pub fn with_version(mut self, version: Selector) -> Self {
        self.version = version;
        self
    }

    pub fn with_build(mut self, build: Selector) -> Self {
        self.build = build;
        self
    }

    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    pub fn with_download<S: Into<String>>(mut self, key: S) -> Self {
        self.download = key.into();
        self
    }

    pub fn with_checksum_verification(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }
}

impl Default for DownloadRequest {
    fn default() -> Self {
        Self::new("paper")
    }
}

/// Concrete identifiers of one build plus its record
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    pub project: String,
    pub group: String,
    pub version: String,
    pub build: String,
    pub info: BuildInfo,
}

/// Fully resolved request: which file to fetch and where to put it
#[derive(Debug, Clone)]
pub struct Resolution {
    pub project: String,
    pub group: String,
    pub version: String,
    pub build: String,
    pub artifact: Download,
    pub output: PathBuf,
}

/// Resolves selectors against a [`BuildApi`]
pub struct Resolver<'a, A: BuildApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: BuildApi + ?Sized> Resolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Resolve group, version and build, then fetch the build record.
    ///
    /// The build record is always fetched, even when every selector was
    /// explicit: the artifact's file name is only available there.
    pub async fn resolve_build(&self, request: &DownloadRequest) -> Result<ResolvedBuild> {
        let project = request.project.as_str();

        let group = match &request.group {
            Selector::Explicit(group) => group.clone(),
            Selector::Latest => {
                let info = self.api.project(project).await?;
                last_of(info.version_groups, ListKind::VersionGroups, project)?
            }
        };
        debug!("Resolved group: {}", group);

        let version = match &request.version {
            Selector::Explicit(version) => version.clone(),
            Selector::Latest => {
                let info = self.api.version_group(project, &group).await?;
                last_of(info.versions, ListKind::Versions, &format!("{} {}", project, group))?
            }
        };
        debug!("Resolved version: {}", version);

        let build = match &request.build {
            Selector::Explicit(build) => build.clone(),
            Selector::Latest => {
                let info = self.api.version(project, &version).await?;
                last_of(info.builds, ListKind::Builds, &format!("{} {}", project, version))?
                    .to_string()
            }
        };
        debug!("Resolved build: {}", build);

        let info = self.api.build(project, &version, &build).await?;

        Ok(ResolvedBuild {
            project: project.to_string(),
            group,
            version,
            build,
            info,
        })
    }

    /// Resolve the request down to an artifact and an output path
    pub async fn resolve(&self, request: &DownloadRequest) -> Result<Resolution> {
        let resolved = self.resolve_build(request).await?;

        let artifact = resolved
            .info
            .download(&request.download)
            .cloned()
            .ok_or_else(|| Error::MissingDownload {
                key: request.download.clone(),
                available: resolved.info.download_keys(),
            })?;

        let output = match &request.output {
            OutputTarget::SourceName => PathBuf::from(&artifact.name),
            OutputTarget::Path(path) => path.clone(),
        };

        info!(
            "Resolved {} {} build {} -> {}",
            resolved.project, resolved.version, resolved.build, artifact.name
        );

        Ok(Resolution {
            project: resolved.project,
            group: resolved.group,
            version: resolved.version,
            build: resolved.build,
            artifact,
            output,
        })
    }
}

/// The API lists oldest first, so the last element is the latest.
fn last_of<T>(items: Vec<T>, kind: ListKind, scope: &str) -> Result<T> {
    items.into_iter().last().ok_or_else(|| Error::EmptyResult {
        kind,
        scope: scope.to_string(),
    })
}
