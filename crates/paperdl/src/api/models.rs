//! Response records of the build-distribution API

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Download key of the server jar in every build record
pub const APPLICATION_DOWNLOAD: &str = "application";

/// `GET /projects`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectList {
    pub projects: Vec<String>,
}

/// `GET /projects/{project}`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub project_id: String,
    pub project_name: String,
    /// Oldest first; the last entry is the newest group
    pub version_groups: Vec<String>,
    pub versions: Vec<String>,
}

/// `GET /projects/{project}/version_group/{group}`
#[derive(Debug, Clone, Deserialize)]
pub struct VersionGroupInfo {
    pub project_id: String,
    pub project_name: String,
    pub version_group: String,
    /// Oldest first; the last entry is the newest version
    pub versions: Vec<String>,
}

/// `GET /projects/{project}/versions/{version}`
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    /// Oldest first; the last entry is the newest build
    pub builds: Vec<u32>,
}

/// `GET /projects/{project}/versions/{version}/builds/{build}`
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    pub build: u32,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub changes: Vec<Change>,
    pub downloads: BTreeMap<String, Download>,
}

impl BuildInfo {
    /// Look up a download by key (`application`, `mojang-mappings`, ...)
    pub fn download(&self, key: &str) -> Option<&Download> {
        self.downloads.get(key)
    }

    pub fn download_keys(&self) -> Vec<String> {
        self.downloads.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub commit: String,
    pub summary: String,
    pub message: String,
}

/// One downloadable file of a build
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Download {
    pub name: String,
    /// Lowercase hex SHA-256 of the file
    pub sha256: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_RESPONSE: &str = r#"{
        "project_id": "paper",
        "project_name": "Paper",
        "version": "1.18.2",
        "build": 388,
        "time": "2022-06-08T03:20:32.611Z",
        "channel": "default",
        "promoted": false,
        "changes": [
            {
                "commit": "f5a6ad4d3c1e36de6c67afab4e1c1a11c0a80b6b",
                "summary": "Updated Upstream (Bukkit/CraftBukkit)",
                "message": "Updated Upstream (Bukkit/CraftBukkit)\n\nUpstream has released updates"
            }
        ],
        "downloads": {
            "application": {
                "name": "paper-1.18.2-388.jar",
                "sha256": "7a3c2bf5e3b8e4b4b37e5e2c5e0e7f2b5e3a1d3c4f2e1d0c9b8a7f6e5d4c3b2a"
            },
            "mojang-mappings": {
                "name": "paper-mojang-mappings-1.18.2-388.txt",
                "sha256": "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0"
            }
        }
    }"#;

    #[test]
    fn test_build_parsing_ignores_unknown_fields() {
        let build: BuildInfo = serde_json::from_str(BUILD_RESPONSE).unwrap();

        assert_eq!(build.build, 388);
        assert_eq!(build.changes.len(), 1);
        assert_eq!(build.changes[0].summary, "Updated Upstream (Bukkit/CraftBukkit)");
        assert_eq!(build.time.to_rfc3339(), "2022-06-08T03:20:32.611+00:00");

        let application = build.download(APPLICATION_DOWNLOAD).unwrap();
        assert_eq!(application.name, "paper-1.18.2-388.jar");
        assert_eq!(build.download_keys(), vec!["application", "mojang-mappings"]);
    }

    #[test]
    fn test_build_without_changes_defaults_to_empty() {
        let build: BuildInfo = serde_json::from_str(
            r#"{"project_id":"velocity","project_name":"Velocity","version":"3.1.1","build":102,
                "time":"2022-03-01T12:00:00Z",
                "downloads":{"application":{"name":"velocity-3.1.1-102.jar","sha256":"ab"}}}"#,
        )
        .unwrap();

        assert!(build.changes.is_empty());
    }

    #[test]
    fn test_version_with_string_builds_is_rejected() {
        let result: Result<VersionInfo, _> = serde_json::from_str(
            r#"{"project_id":"paper","project_name":"Paper","version":"1.18.2","builds":["1","2"]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_project_requires_version_groups() {
        let result: Result<ProjectInfo, _> = serde_json::from_str(
            r#"{"project_id":"paper","project_name":"Paper","versions":["1.18.2"]}"#,
        );
        assert!(result.is_err());
    }
}
