//! Error types for index construction and manifest loading.
//!
//! Asset resolution itself never fails: lookups return `Option` and log a
//! diagnostic. Only building a [`DirectoryIndex`](crate::DirectoryIndex) or
//! loading manifests returns [`Result<T>`].

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed while scanning a directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path does not exist: {0}")]
    NotFound(Utf8PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    /// The path cannot be represented as UTF-8.
    #[error("Non-UTF-8 path: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Manifest error: {0}")]
    Manifest(#[from] rtp_manifest::Error),
}
