//! The anime metadata cache.
//!
//! One `AnimeCache` owns the concurrent key-to-entry store, orchestrates
//! miss handling through the loader registry, aliases loaded records under
//! every source URI they declare, and hands out host-scoped projections on
//! every read.
//!
//! Note: this type is designed to be used behind an `Arc<AnimeCache>`.
//! Synchronization is handled by the internal RwLocks; callers never need
//! external locking.

use crate::entry::CacheEntry;
use crate::loader::CacheLoader;
use crate::registry::LoaderRegistry;
use animodel::Anime;
use anisource::{AnimeId, ProviderConfig};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Concurrent write-once cache of anime records, keyed by provider URI.
pub struct AnimeCache {
    /// Key-to-entry store. Write-once per key.
    entries: RwLock<HashMap<Url, CacheEntry>>,
    /// Loaders, one per provider, fixed at construction.
    registry: LoaderRegistry,
    /// Hosts seen so far, insertion order until externally re-sorted.
    providers: RwLock<Vec<String>>,
    /// Union of the tags of every Present entry ever populated.
    tags: RwLock<BTreeSet<String>>,
}

impl AnimeCache {
    /// Creates a cache over a fixed set of provider loaders.
    pub fn new(loaders: Vec<Arc<dyn CacheLoader>>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            registry: LoaderRegistry::new(loaders),
            providers: RwLock::new(Vec::new()),
            tags: RwLock::new(BTreeSet::new()),
        }
    }

    /// Returns the entry for a key, loading it remotely on a miss.
    ///
    /// A `Present` result is a host-scoped projection of the stored record,
    /// recomputed on every read: `sources` narrowed to exactly `key`,
    /// `related_anime` narrowed to `key`'s host.
    ///
    /// Every loader fault is absorbed here: the key is populated `Dead` and
    /// `Dead` is returned; callers never observe the fault itself. A key
    /// whose host no loader serves also yields `Dead`, but is never stored,
    /// so it is re-evaluated on every call.
    pub async fn fetch(&self, key: &Url) -> CacheEntry {
        if let Some(entry) = self.entries.read().await.get(key) {
            return Self::project(entry, key);
        }

        let Some(loader) = self.registry.loader_for(key) else {
            tracing::debug!("No loader for host of {}, returning dead entry", key);
            return CacheEntry::Dead;
        };

        match loader.load_anime(key).await {
            Ok(record) => {
                let projection = CacheEntry::present(record.scoped_to(key));
                let entry = CacheEntry::present(record);
                self.alias(&entry).await;
                projection
            }
            Err(err) => {
                tracing::warn!("Failed to load {}: {}", key, err);
                self.populate(key.clone(), CacheEntry::Dead).await;
                CacheEntry::Dead
            }
        }
    }

    /// Writes an entry under a key, if the key is still vacant.
    ///
    /// Appends the key's host to the provider list when new and unions a
    /// Present entry's tags into the tag set. Populating an existing key is
    /// a logged no-op: the store is write-once.
    pub async fn populate(&self, key: Url, entry: CacheEntry) {
        if let Some(host) = key.host_str() {
            let mut providers = self.providers.write().await;
            if !providers.iter().any(|known| known == host) {
                providers.push(host.to_string());
            }
        }

        if let Some(record) = entry.record() {
            if !record.tags.is_empty() {
                let mut tags = self.tags.write().await;
                tags.extend(record.tags.iter().cloned());
            }
        }

        match self.entries.write().await.entry(key) {
            Entry::Occupied(slot) => {
                tracing::debug!("Entry for {} already populated, skipping", slot.key());
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    /// Seeds permanent negative entries from a provider's dead-id feed.
    pub async fn seed_dead_entries(&self, config: &dyn ProviderConfig, ids: &[AnimeId]) {
        for id in ids {
            self.populate(config.uri_for(id), CacheEntry::Dead).await;
        }
        tracing::info!(
            "Seeded {} dead entries for {}",
            ids.len(),
            config.hostname()
        );
    }

    /// Empties the key-to-entry store.
    ///
    /// The provider list and the tag set deliberately survive: they describe
    /// what has ever been seen, which outlives any one cache generation.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// All Present records stored under the given host, one host-scoped
    /// projection per stored key, de-duplicated.
    ///
    /// The result is recomputed from the live store on every call.
    pub async fn all_entries(&self, host: &str) -> Vec<Anime> {
        let entries = self.entries.read().await;
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for (key, entry) in entries.iter() {
            if key.host_str() != Some(host) {
                continue;
            }
            let Some(record) = entry.record() else {
                continue;
            };
            let scoped = record.scoped_to(key);
            if seen.insert(scoped.clone()) {
                result.push(scoped);
            }
        }

        result
    }

    /// Source URIs of `key`'s record living on another provider's host.
    ///
    /// Empty when the key is absent or dead. Used to find a title's identity
    /// on a different provider.
    pub async fn map_to_meta_data_provider(&self, key: &Url, host: &str) -> BTreeSet<Url> {
        match self.entries.read().await.get(key) {
            Some(CacheEntry::Present(record)) => record
                .sources
                .iter()
                .filter(|source| source.host_str() == Some(host))
                .cloned()
                .collect(),
            _ => BTreeSet::new(),
        }
    }

    /// Re-sorts the provider list descending by the supplied per-host count.
    ///
    /// Driven by an external bulk-population-finished signal; affects only
    /// the presentation order, never cache correctness.
    pub async fn reorder_providers(&self, counts: &HashMap<String, u64>) {
        let mut providers = self.providers.write().await;
        providers.sort_by(|a, b| {
            let count_a = counts.get(a).copied().unwrap_or(0);
            let count_b = counts.get(b).copied().unwrap_or(0);
            count_b.cmp(&count_a)
        });
        tracing::debug!("Provider order is now {:?}", *providers);
    }

    /// Hosts seen so far, in presentation order.
    pub async fn available_meta_data_provider(&self) -> Vec<String> {
        self.providers.read().await.clone()
    }

    /// Union of the tags of all cached Present entries.
    pub async fn available_tags(&self) -> BTreeSet<String> {
        self.tags.read().await.clone()
    }

    /// Number of stored entries (Present and Dead).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// `true` when no entry is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Aliases a loaded record: one populate per declared source URI.
    async fn alias(&self, entry: &CacheEntry) {
        let Some(record) = entry.record() else {
            return;
        };
        for source in &record.sources {
            self.populate(source.clone(), entry.clone()).await;
        }
    }

    /// Projects a stored entry onto the requested key.
    fn project(entry: &CacheEntry, key: &Url) -> CacheEntry {
        match entry {
            CacheEntry::Present(record) => CacheEntry::present(record.scoped_to(key)),
            CacheEntry::Dead => CacheEntry::Dead,
        }
    }
}
