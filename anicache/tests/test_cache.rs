use anicache::{AnimeCache, CacheEntry, CacheLoader, LoadError};
use animodel::Anime;
use anisource::{myanimelist, AnimeId, DownloadError, ProviderConfig};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// Loader stub serving one prepared record (or a permanent failure).
struct StubLoader {
    hostname: &'static str,
    record: Option<Anime>,
    calls: AtomicUsize,
}

impl StubLoader {
    fn serving(hostname: &'static str, record: Anime) -> Arc<Self> {
        Arc::new(Self {
            hostname,
            record: Some(record),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(hostname: &'static str) -> Arc<Self> {
        Arc::new(Self {
            hostname,
            record: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheLoader for StubLoader {
    fn hostname(&self) -> &str {
        self.hostname
    }

    async fn load_anime(&self, _uri: &Url) -> anicache::Result<Anime> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.record {
            Some(record) => Ok(record.clone()),
            None => Err(LoadError::Download(DownloadError::DeadEntry)),
        }
    }
}

fn cache_with(loaders: Vec<Arc<StubLoader>>) -> AnimeCache {
    AnimeCache::new(
        loaders
            .into_iter()
            .map(|loader| loader as Arc<dyn CacheLoader>)
            .collect(),
    )
}

/// A "Death Note" record known to two providers, with one related title each.
fn death_note() -> Anime {
    let mut anime = Anime::new("Death Note");
    anime.episodes = 37;
    anime.sources = BTreeSet::from([
        url("https://myanimelist.net/anime/1535"),
        url("https://kitsu.app/anime/1376"),
    ]);
    anime.related_anime = BTreeSet::from([
        url("https://myanimelist.net/anime/2994"),
        url("https://kitsu.app/anime/2707"),
    ]);
    anime.tags = BTreeSet::from(["thriller".to_string(), "shounen".to_string()]);
    anime
}

#[tokio::test]
async fn test_populate_is_write_once() {
    let cache = cache_with(vec![]);
    let key = url("https://myanimelist.net/anime/1535");

    cache
        .populate(key.clone(), CacheEntry::present(Anime::new("first")))
        .await;
    cache
        .populate(key.clone(), CacheEntry::present(Anime::new("second")))
        .await;

    let entry = cache.fetch(&key).await;
    assert_eq!(entry.record().unwrap().title, "first");
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_fetch_aliases_all_source_uris() {
    let loader = StubLoader::serving("myanimelist.net", death_note());
    let cache = cache_with(vec![loader.clone()]);

    let entry = cache.fetch(&url("https://myanimelist.net/anime/1535")).await;
    assert!(entry.is_present());
    assert_eq!(loader.calls(), 1);

    // The kitsu identity must now resolve from the store, without any
    // loader involvement (there is no kitsu loader registered at all)
    let aliased = cache.fetch(&url("https://kitsu.app/anime/1376")).await;
    assert!(aliased.is_present());
    assert_eq!(loader.calls(), 1);
}

#[tokio::test]
async fn test_fetch_failure_is_cached_as_dead() {
    let loader = StubLoader::failing("anidb.net");
    let cache = cache_with(vec![loader.clone()]);
    let key = url("https://anidb.net/anime/4563");

    assert!(cache.fetch(&key).await.is_dead());
    assert!(cache.fetch(&key).await.is_dead());

    // The loader ran exactly once; the tombstone absorbed the second call
    assert_eq!(loader.calls(), 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_fetch_unknown_host_is_dead_but_never_stored() {
    let cache = cache_with(vec![StubLoader::serving("myanimelist.net", death_note())]);
    let key = url("https://example.org/anime/1");

    assert!(cache.fetch(&key).await.is_dead());
    assert!(cache.fetch(&key).await.is_dead());
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn test_fetch_returns_host_scoped_projection() {
    let loader = StubLoader::serving("myanimelist.net", death_note());
    let cache = cache_with(vec![loader]);
    let key = url("https://myanimelist.net/anime/1535");

    let entry = cache.fetch(&key).await;
    let record = entry.record().unwrap();

    assert_eq!(record.sources, BTreeSet::from([key]));
    assert_eq!(
        record.related_anime,
        BTreeSet::from([url("https://myanimelist.net/anime/2994")])
    );
    // Scalar fields are untouched by the projection
    assert_eq!(record.episodes, 37);
}

#[tokio::test]
async fn test_projection_is_recomputed_per_key() {
    let loader = StubLoader::serving("myanimelist.net", death_note());
    let cache = cache_with(vec![loader]);

    cache.fetch(&url("https://myanimelist.net/anime/1535")).await;

    let entry = cache.fetch(&url("https://kitsu.app/anime/1376")).await;
    let record = entry.record().unwrap();
    assert_eq!(
        record.sources,
        BTreeSet::from([url("https://kitsu.app/anime/1376")])
    );
    assert_eq!(
        record.related_anime,
        BTreeSet::from([url("https://kitsu.app/anime/2707")])
    );
}

#[tokio::test]
async fn test_all_entries_projects_and_deduplicates() {
    let cache = cache_with(vec![]);

    let mut monster = Anime::new("Monster");
    monster.sources = BTreeSet::from([
        url("https://myanimelist.net/anime/19"),
        url("https://kitsu.app/anime/7"),
    ]);

    // Alias both records by hand, the way a loader-driven fetch would
    for record in [death_note(), monster] {
        let entry = CacheEntry::present(record.clone());
        for source in &record.sources {
            cache.populate(source.clone(), entry.clone()).await;
        }
    }
    cache
        .populate(url("https://myanimelist.net/anime/404"), CacheEntry::Dead)
        .await;

    let entries = cache.all_entries("myanimelist.net").await;
    assert_eq!(entries.len(), 2);
    for record in &entries {
        assert_eq!(record.sources.len(), 1);
        let source = record.sources.first().unwrap();
        assert_eq!(source.host_str(), Some("myanimelist.net"));
    }

    // Restartable: a second consumption sees the same live state
    assert_eq!(cache.all_entries("myanimelist.net").await.len(), 2);
    assert_eq!(cache.all_entries("kitsu.app").await.len(), 2);
    assert!(cache.all_entries("anidb.net").await.is_empty());
}

#[tokio::test]
async fn test_map_to_meta_data_provider() {
    let loader = StubLoader::serving("myanimelist.net", death_note());
    let cache = cache_with(vec![loader]);
    let key = url("https://myanimelist.net/anime/1535");

    cache.fetch(&key).await;

    let on_kitsu = cache.map_to_meta_data_provider(&key, "kitsu.app").await;
    assert_eq!(
        on_kitsu,
        BTreeSet::from([url("https://kitsu.app/anime/1376")])
    );

    // Dead and absent keys both map to nothing
    let dead = url("https://myanimelist.net/anime/404");
    cache.populate(dead.clone(), CacheEntry::Dead).await;
    assert!(cache
        .map_to_meta_data_provider(&dead, "kitsu.app")
        .await
        .is_empty());
    assert!(cache
        .map_to_meta_data_provider(&url("https://myanimelist.net/anime/999"), "kitsu.app")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_provider_list_keeps_insertion_order_until_reordered() {
    let cache = cache_with(vec![]);

    for host in ["myanimelist.net", "kitsu.app", "anidb.net"] {
        cache
            .populate(
                url(&format!("https://{}/anime/1", host)),
                CacheEntry::Dead,
            )
            .await;
    }
    assert_eq!(
        cache.available_meta_data_provider().await,
        vec!["myanimelist.net", "kitsu.app", "anidb.net"]
    );

    let counts = HashMap::from([
        ("kitsu.app".to_string(), 900_u64),
        ("anidb.net".to_string(), 500_u64),
        // myanimelist.net missing on purpose, counts as zero
    ]);
    cache.reorder_providers(&counts).await;
    assert_eq!(
        cache.available_meta_data_provider().await,
        vec!["kitsu.app", "anidb.net", "myanimelist.net"]
    );
}

#[tokio::test]
async fn test_available_tags_is_union_of_present_entries() {
    let cache = cache_with(vec![]);

    cache
        .populate(
            url("https://myanimelist.net/anime/1535"),
            CacheEntry::present(death_note()),
        )
        .await;

    let mut other = Anime::new("Mushishi");
    other.tags = BTreeSet::from(["iyashikei".to_string()]);
    cache
        .populate(url("https://kitsu.app/anime/33"), CacheEntry::present(other))
        .await;

    assert_eq!(
        cache.available_tags().await,
        BTreeSet::from([
            "iyashikei".to_string(),
            "shounen".to_string(),
            "thriller".to_string()
        ])
    );
}

#[tokio::test]
async fn test_clear_empties_entries_only() {
    let cache = cache_with(vec![]);
    cache
        .populate(
            url("https://myanimelist.net/anime/1535"),
            CacheEntry::present(death_note()),
        )
        .await;

    cache.clear().await;

    assert!(cache.is_empty().await);
    assert_eq!(
        cache.available_meta_data_provider().await,
        vec!["myanimelist.net"]
    );
    assert!(!cache.available_tags().await.is_empty());
}

#[tokio::test]
async fn test_seed_dead_entries() {
    let cache = cache_with(vec![]);
    let config = myanimelist();

    cache
        .seed_dead_entries(&config, &[AnimeId::from("101"), AnimeId::from("102")])
        .await;

    assert_eq!(cache.len().await, 2);
    assert!(cache.fetch(&config.uri_for(&AnimeId::from("101"))).await.is_dead());

    // Seeding never overwrites an existing entry
    cache
        .populate(
            config.uri_for(&AnimeId::from("103")),
            CacheEntry::present(Anime::new("still here")),
        )
        .await;
    cache
        .seed_dead_entries(&config, &[AnimeId::from("103")])
        .await;
    let entry = cache.fetch(&config.uri_for(&AnimeId::from("103"))).await;
    assert!(entry.is_present());
}

#[tokio::test]
async fn test_concurrent_fetches_preserve_write_once() {
    let loader = StubLoader::serving("myanimelist.net", death_note());
    let cache = Arc::new(cache_with(vec![loader.clone()]));
    let key = url("https://myanimelist.net/anime/1535");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move { cache.fetch(&key).await }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_present());
    }

    // Racing misses may each run the pipeline, but the store holds exactly
    // one entry per source URI
    assert_eq!(cache.len().await, 2);
    assert!(loader.calls() >= 1);
}

/// End-to-end aliasing + projection: six provider identities of one title,
/// resolved through whichever loader sees the first request.
#[tokio::test]
async fn test_six_provider_identities_resolve_to_scoped_views() {
    let hosts = [
        "myanimelist.net",
        "anidb.net",
        "anime-planet.com",
        "notify.moe",
        "anilist.co",
        "kitsu.app",
    ];
    let keys: Vec<Url> = vec![
        url("https://myanimelist.net/anime/1535"),
        url("https://anidb.net/anime/4563"),
        url("https://anime-planet.com/anime/death-note"),
        url("https://notify.moe/anime/0-A-5Fimg"),
        url("https://anilist.co/anime/1535"),
        url("https://kitsu.app/anime/1376"),
    ];

    let mut record = Anime::new("Death Note");
    record.sources = keys.iter().cloned().collect();
    record.related_anime = keys
        .iter()
        .map(|key| {
            let mut related = key.clone();
            related.set_path("/anime/9999");
            related
        })
        .collect();

    let loaders: Vec<Arc<StubLoader>> = hosts
        .iter()
        .map(|host| StubLoader::serving(host, record.clone()))
        .collect();
    let cache = cache_with(loaders.clone());

    for key in &keys {
        let entry = cache.fetch(key).await;
        let scoped = entry.record().unwrap();
        assert_eq!(scoped.sources, BTreeSet::from([key.clone()]));
        assert_eq!(scoped.related_anime.len(), 1);
        let related = scoped.related_anime.first().unwrap();
        assert_eq!(related.host_str(), key.host_str());
    }

    // The first fetch populated all six identities; no other loader ran
    let total_calls: usize = loaders.iter().map(|loader| loader.calls()).sum();
    assert_eq!(total_calls, 1);
    assert_eq!(cache.len().await, 6);
}
