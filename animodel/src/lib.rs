//! Minimal anime metadata model shared between the ani* crates.
//!
//! This crate provides the canonical, provider-agnostic anime record
//! ([`Anime`]) together with its value types. A record is addressable by
//! every URI in its [`Anime::sources`] set — one per provider that knows the
//! same title — and carries cross-provider relations and tags.
//!
//! The cache layer never edits `sources` or `related_anime`; those are
//! filled in by the per-provider converters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

/// Broadcast format of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnimeType {
    Tv,
    Movie,
    Ova,
    Ona,
    Special,
    Unknown,
}

impl Default for AnimeType {
    fn default() -> Self {
        AnimeType::Unknown
    }
}

/// Airing status of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Finished,
    Ongoing,
    Upcoming,
    Unknown,
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown
    }
}

/// Quarter of the year a title premiered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    Undefined,
}

impl Default for Season {
    fn default() -> Self {
        Season::Undefined
    }
}

/// Premiere season of a title.
///
/// `year` is `None` when the provider does not publish one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnimeSeason {
    pub season: Season,
    pub year: Option<u16>,
}

/// The canonical anime record.
///
/// `sources` holds one URI per provider known to describe this title;
/// `related_anime` holds URIs of related titles (sequels, spin-offs),
/// potentially spanning several providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anime {
    pub sources: BTreeSet<Url>,
    pub title: String,
    #[serde(rename = "type")]
    pub anime_type: AnimeType,
    pub episodes: u32,
    pub status: Status,
    pub anime_season: AnimeSeason,
    pub thumbnail: Option<Url>,
    pub related_anime: BTreeSet<Url>,
    pub tags: BTreeSet<String>,
}

impl Anime {
    /// Creates an empty record with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            sources: BTreeSet::new(),
            title: title.into(),
            anime_type: AnimeType::default(),
            episodes: 0,
            status: Status::default(),
            anime_season: AnimeSeason::default(),
            thumbnail: None,
            related_anime: BTreeSet::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Returns a copy of this record narrowed to one provider identity.
    ///
    /// `sources` is reduced to exactly `key`, and `related_anime` to the
    /// URIs living on `key`'s host. This is the read-time view the cache
    /// hands out; the stored record is never modified.
    pub fn scoped_to(&self, key: &Url) -> Anime {
        let host = key.host_str().unwrap_or_default();
        let mut scoped = self.clone();
        scoped.sources = BTreeSet::from([key.clone()]);
        scoped.related_anime = self
            .related_anime
            .iter()
            .filter(|uri| host_matches(uri, host))
            .cloned()
            .collect();
        scoped
    }
}

/// Returns `true` when `uri`'s host contains the given host string.
///
/// Substring semantics on purpose: provider hosts are matched with and
/// without `www.` prefixes.
pub fn host_matches(uri: &Url, host: &str) -> bool {
    if host.is_empty() {
        return false;
    }
    uri.host_str().is_some_and(|h| h.contains(host))
}
