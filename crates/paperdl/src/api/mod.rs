//! Build-distribution API client and its response records

pub mod client;
pub mod models;

pub use client::{ApiClient, BuildApi};
pub use models::{
    APPLICATION_DOWNLOAD, BuildInfo, Change, Download, ProjectInfo, ProjectList, VersionGroupInfo,
    VersionInfo,
};
