//! Configuration objects for the six known metadata providers.
//!
//! All six share the `https://{host}/anime/{id}` URI shape, so one struct
//! covers them; the constructors pin the host and the scratch-file suffix.

use crate::{AnimeId, ExtractError, ProviderConfig};
use url::Url;

/// Provider configuration for hosts with `/anime/{id}` paths.
#[derive(Debug, Clone, Copy)]
pub struct HostPathConfig {
    hostname: &'static str,
    file_suffix: &'static str,
}

impl HostPathConfig {
    // Not public: `uri_for` builds URIs by template and requires a hostname
    // that parses, which only the constructors below guarantee.
    const fn new(hostname: &'static str, file_suffix: &'static str) -> Self {
        Self {
            hostname,
            file_suffix,
        }
    }
}

impl ProviderConfig for HostPathConfig {
    fn hostname(&self) -> &'static str {
        self.hostname
    }

    /// The id is the path segment following `anime`, e.g.
    /// `https://myanimelist.net/anime/1535` yields `1535`.
    fn extract_anime_id(&self, uri: &Url) -> Result<AnimeId, ExtractError> {
        let segments = uri.path_segments().ok_or_else(|| ExtractError {
            uri: uri.to_string(),
        })?;

        segments
            .skip_while(|segment| *segment != "anime")
            .nth(1)
            .filter(|id| !id.is_empty())
            .map(|id| AnimeId(id.to_string()))
            .ok_or_else(|| ExtractError {
                uri: uri.to_string(),
            })
    }

    fn file_suffix(&self) -> &'static str {
        self.file_suffix
    }

    fn uri_for(&self, id: &AnimeId) -> Url {
        // Host and id shapes are static, the result always parses
        Url::parse(&format!("https://{}/anime/{}", self.hostname, id))
            .expect("provider URI template is valid")
    }
}

/// myanimelist.net (simple pipeline).
pub const fn myanimelist() -> HostPathConfig {
    HostPathConfig::new("myanimelist.net", "mal.json")
}

/// anidb.net (simple pipeline).
pub const fn anidb() -> HostPathConfig {
    HostPathConfig::new("anidb.net", "anidb.json")
}

/// anime-planet.com (simple pipeline).
pub const fn anime_planet() -> HostPathConfig {
    HostPathConfig::new("anime-planet.com", "anime-planet.json")
}

/// notify.moe (simple pipeline).
pub const fn notify() -> HostPathConfig {
    HostPathConfig::new("notify.moe", "notify.json")
}

/// anilist.co (staged pipeline, relations side channel).
pub const fn anilist() -> HostPathConfig {
    HostPathConfig::new("anilist.co", "anilist.json")
}

/// kitsu.app (staged pipeline, relations and tags side channels).
pub const fn kitsu() -> HostPathConfig {
    HostPathConfig::new("kitsu.app", "kitsu.json")
}
