//! # anisource
//!
//! Common traits and types for anime metadata providers.
//!
//! This crate defines the boundary the cache layer (`anicache`) builds on:
//! every remote provider is abstracted as a [`Downloader`]/[`Converter`]
//! pair plus a [`ProviderConfig`] describing its host and id scheme.
//!
//! ## Features
//!
//! - **Downloader/Converter split**: transport and payload interpretation
//!   are independent, so tests can stub either side.
//! - **Dead-entry signalling**: a provider can report an id as permanently
//!   removed ([`DownloadError::DeadEntry`]), distinct from transport faults.
//! - **Side-channel payloads**: converters that need auxiliary downloads
//!   (relations, tags) receive them as explicit file paths via
//!   [`AuxPayloads`], never through an implicit naming convention.
//! - **Send + Sync**: ready for concurrent use behind `Arc`.

pub mod download;
pub mod error;
pub mod providers;

use animodel::Anime;
use std::fmt;
use std::path::Path;
use url::Url;

pub use download::HttpDownloader;
pub use error::{ConvertError, DownloadError, ExtractError};
pub use providers::{
    anidb, anilist, anime_planet, kitsu, myanimelist, notify, HostPathConfig,
};

/// Raw payload body as returned by a provider endpoint.
pub type RawPayload = String;

/// Provider-local identifier of one title (e.g. `"1535"` on myanimelist).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimeId(pub String);

impl AnimeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnimeId {
    fn from(value: &str) -> Self {
        AnimeId(value.to_string())
    }
}

/// Static description of one provider: its host and its id scheme.
///
/// One configuration object exists per provider and is shared between the
/// loader (id extraction, scratch-file naming) and the dead-entry seeding
/// path (id to URI).
pub trait ProviderConfig: Send + Sync {
    /// Host this provider answers on (e.g. `"myanimelist.net"`).
    fn hostname(&self) -> &'static str;

    /// Extracts the provider-local anime id from a web URI.
    fn extract_anime_id(&self, uri: &Url) -> Result<AnimeId, ExtractError>;

    /// Suffix used when naming scratch files for this provider.
    fn file_suffix(&self) -> &'static str;

    /// Builds the canonical web URI for an id (inverse of extraction).
    fn uri_for(&self, id: &AnimeId) -> Url;
}

/// Fetches one payload for an anime id.
///
/// Implementations exist per provider endpoint; a staged pipeline uses one
/// downloader for the primary payload and further ones for the auxiliary
/// endpoints (relations, tags).
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, id: &AnimeId) -> Result<RawPayload, DownloadError>;
}

/// Auxiliary payloads handed to a converter as scratch-file paths.
///
/// The files are written by the loader before the primary download runs and
/// removed by the loader afterwards; a converter only ever reads them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuxPayloads<'a> {
    pub relations: Option<&'a Path>,
    pub tags: Option<&'a Path>,
}

impl<'a> AuxPayloads<'a> {
    /// No auxiliary payloads (simple pipelines).
    pub fn none() -> Self {
        Self::default()
    }

    /// Relations payload only (single side channel).
    pub fn with_relations(relations: &'a Path) -> Self {
        Self {
            relations: Some(relations),
            tags: None,
        }
    }

    /// Relations and tags payloads (parallel side channels).
    pub fn with_relations_and_tags(relations: &'a Path, tags: &'a Path) -> Self {
        Self {
            relations: Some(relations),
            tags: Some(tags),
        }
    }
}

/// Converts a raw provider payload into the canonical record.
///
/// The converter fills in `sources` (every cross-provider URI it can derive
/// from the payload), `related_anime` and `tags`; the cache layer never
/// touches those sets.
#[async_trait::async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, raw: &str, aux: AuxPayloads<'_>) -> Result<Anime, ConvertError>;
}
