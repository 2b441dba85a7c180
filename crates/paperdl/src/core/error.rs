//! Error types for the resolution and download pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Every way a run can fail. None of them are retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection, DNS, timeout or body read failure
    #[error("HTTP request to '{url}' failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("API request to '{url}' returned {status}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// Response body is not JSON or does not have the expected shape
    #[error("Failed to decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A "latest" lookup returned a list with no elements
    #[error("No {kind} available for {scope}")]
    EmptyResult { kind: ListKind, scope: String },

    /// The build record has no download under the requested key
    #[error("Build has no '{key}' download (available: {})", .available.join(", "))]
    MissingDownload { key: String, available: Vec<String> },

    /// File system I/O errors with file context
    #[error("Failed {operation} '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Downloaded bytes do not hash to the advertised SHA-256
    #[error("Checksum mismatch for '{file}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

/// Which listing came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    VersionGroups,
    Versions,
    Builds,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::VersionGroups => write!(f, "version groups"),
            ListKind::Versions => write!(f, "versions"),
            ListKind::Builds => write!(f, "builds"),
        }
    }
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Create,
    Write,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Write => write!(f, "writing"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Transport { .. } => "transport",
            Error::Api { .. } => "api",
            Error::Decode { .. } => "decode",
            Error::EmptyResult { .. } => "empty_result",
            Error::MissingDownload { .. } => "missing_download",
            Error::FileSystem { .. } => "file_system",
            Error::ChecksumMismatch { .. } => "checksum_mismatch",
            Error::InvalidUrl { .. } => "invalid_url",
            Error::Configuration { .. } => "configuration",
        }
    }

    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        Error::Transport {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_message_names_list_and_scope() {
        let err = Error::EmptyResult {
            kind: ListKind::Builds,
            scope: "paper 1.18.2".to_string(),
        };
        assert_eq!(err.to_string(), "No builds available for paper 1.18.2");
        assert_eq!(err.category(), "empty_result");
    }

    #[test]
    fn test_missing_download_lists_available_keys() {
        let err = Error::MissingDownload {
            key: "server".to_string(),
            available: vec!["application".to_string(), "mojang-mappings".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Build has no 'server' download (available: application, mojang-mappings)"
        );
    }

    #[test]
    fn test_file_system_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::FileSystem {
            path: PathBuf::from("/nope/paper.jar"),
            operation: FileOperation::Create,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        assert_eq!(err.to_string(), "Failed creating '/nope/paper.jar'");
        assert!(err.source().is_some());
    }
}
