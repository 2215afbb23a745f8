//! Error types for manifest loading.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating RTP manifests.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the manifest file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The manifest file extension is neither `.json` nor `.toml`.
    #[error("Unknown manifest format: {0}")]
    UnknownFormat(Utf8PathBuf),

    /// An entry has a different number of names than the manifest has variants.
    #[error("Manifest entry in '{dir}' has {found} names, expected {expected}")]
    ColumnMismatch {
        dir: String,
        expected: usize,
        found: usize,
    },
}
