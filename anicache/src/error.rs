//! Error types for the load pipelines.

use anisource::{ConvertError, DownloadError, ExtractError};
use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors raised by a loader pipeline.
///
/// None of these ever reach cache callers: `AnimeCache::fetch` absorbs them
/// into a dead entry for the requested key.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The URI carries no recognizable anime id for its provider.
    #[error("Unsupported URI: {0}")]
    UnsupportedUri(#[from] ExtractError),

    /// A primary or auxiliary download failed.
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    /// The converter rejected the payload.
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    /// A scratch file could not be written.
    #[error("Scratch file error: {0}")]
    Scratch(std::io::Error),
}
