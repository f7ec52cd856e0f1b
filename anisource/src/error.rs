//! Error types for the provider boundary.
//!
//! A download fault and a conversion fault are kept apart on purpose: the
//! cache layer collapses both into a dead entry, but logs and tests need to
//! tell a transport problem from a payload problem. A provider signalling a
//! known-dead id is its own variant, distinct from transport failure.

use thiserror::Error;

/// Errors raised while fetching a payload from a provider.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The provider reports the id as permanently removed.
    #[error("Provider reports a dead entry")]
    DeadEntry,

    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status that is not a dead-entry signal.
    #[error("Unexpected HTTP status {code}")]
    Status { code: u16 },

    /// Local I/O failure while handling the payload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while converting a raw payload into a canonical record.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Payload is not valid JSON.
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Payload parsed but a required field is absent.
    #[error("Missing field in provider payload: {0}")]
    MissingField(&'static str),

    /// Failure reading an auxiliary payload file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider-specific conversion failure.
    #[error("Conversion error: {0}")]
    Other(String),
}

/// A URI that does not carry a recognizable anime id for its provider.
#[derive(Error, Debug)]
#[error("No anime id in URI: {uri}")]
pub struct ExtractError {
    pub uri: String,
}
