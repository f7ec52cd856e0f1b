//! Provider registry.

use crate::loader::CacheLoader;
use animodel::host_matches;
use std::sync::Arc;
use url::Url;

/// Static list of (host, loader) pairs established at cache construction.
///
/// Lookup substring-matches a key's host against each loader's declared
/// hostname; first match wins. A missing match is not an error here, the
/// cache turns it into an un-stored dead result.
pub struct LoaderRegistry {
    loaders: Vec<Arc<dyn CacheLoader>>,
}

impl LoaderRegistry {
    pub fn new(loaders: Vec<Arc<dyn CacheLoader>>) -> Self {
        Self { loaders }
    }

    /// Resolves the loader responsible for a key's host.
    pub fn loader_for(&self, key: &Url) -> Option<&Arc<dyn CacheLoader>> {
        self.loaders
            .iter()
            .find(|loader| host_matches(key, loader.hostname()))
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }
}
