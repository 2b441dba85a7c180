//! Core types used throughout the client
//!
//! Errors and progress reporting live here so the API client, the resolver
//! and the fetcher can share them without depending on each other.

pub mod error;
pub mod progress;

pub use error::{Error, FileOperation, ListKind, Result};
pub use progress::{
    ConsoleProgressReporter, IntoProgressCallback, ProgressCallback, ProgressEvent, ProgressReporter,
};
