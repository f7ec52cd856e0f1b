//! Loader pipelines.
//!
//! A loader owns the full fetch pipeline of one provider and produces a
//! converted record or fails; it performs no retries and caches nothing.
//! Three shapes exist:
//!
//! - [`SimpleLoader`]: download + convert.
//! - [`StagedLoader`]: one auxiliary fetch (relations) staged to a scratch
//!   file before the primary download.
//! - [`ParallelStagedLoader`]: two auxiliary fetches (relations, tags) run
//!   concurrently; both must complete before the primary download.
//!
//! Any fault during extraction, auxiliary fetch, primary fetch or conversion
//! propagates to the caller; scratch files are removed on every exit path.

use crate::error::{LoadError, Result};
use crate::scratch::ScratchSpace;
use animodel::Anime;
use anisource::{AnimeId, AuxPayloads, Converter, Downloader, ProviderConfig};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use url::Url;

const RELATIONS: &str = "relations";
const TAGS: &str = "tags";

/// One provider's fetch pipeline.
#[async_trait]
pub trait CacheLoader: Send + Sync {
    /// Host this loader serves.
    fn hostname(&self) -> &str;

    /// Runs the full pipeline for one key.
    async fn load_anime(&self, uri: &Url) -> Result<Anime>;
}

fn fresh_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Single download + convert, no auxiliary state.
pub struct SimpleLoader {
    config: Arc<dyn ProviderConfig>,
    downloader: Arc<dyn Downloader>,
    converter: Arc<dyn Converter>,
}

impl SimpleLoader {
    pub fn new(
        config: Arc<dyn ProviderConfig>,
        downloader: Arc<dyn Downloader>,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            config,
            downloader,
            converter,
        }
    }
}

#[async_trait]
impl CacheLoader for SimpleLoader {
    fn hostname(&self) -> &str {
        self.config.hostname()
    }

    async fn load_anime(&self, uri: &Url) -> Result<Anime> {
        let id = self.config.extract_anime_id(uri)?;
        tracing::debug!("Loading {} entry {}", self.hostname(), id);
        let raw = self.downloader.download(&id).await?;
        Ok(self.converter.convert(&raw, AuxPayloads::none()).await?)
    }
}

/// Pipeline with one relations side channel.
///
/// The relations payload is fetched first and staged to a scratch file; the
/// converter receives its path alongside the primary payload.
pub struct StagedLoader {
    config: Arc<dyn ProviderConfig>,
    downloader: Arc<dyn Downloader>,
    relations: Arc<dyn Downloader>,
    converter: Arc<dyn Converter>,
    scratch: Arc<ScratchSpace>,
}

impl StagedLoader {
    pub fn new(
        config: Arc<dyn ProviderConfig>,
        downloader: Arc<dyn Downloader>,
        relations: Arc<dyn Downloader>,
        converter: Arc<dyn Converter>,
        scratch: Arc<ScratchSpace>,
    ) -> Self {
        Self {
            config,
            downloader,
            relations,
            converter,
            scratch,
        }
    }

    async fn convert_with_relations(&self, id: &AnimeId, relations: &Path) -> Result<Anime> {
        let raw = self.downloader.download(id).await?;
        Ok(self
            .converter
            .convert(&raw, AuxPayloads::with_relations(relations))
            .await?)
    }
}

#[async_trait]
impl CacheLoader for StagedLoader {
    fn hostname(&self) -> &str {
        self.config.hostname()
    }

    async fn load_anime(&self, uri: &Url) -> Result<Anime> {
        let id = self.config.extract_anime_id(uri)?;
        let token = fresh_token();
        let suffix = self.config.file_suffix();
        tracing::debug!("Loading {} entry {} (staged)", self.hostname(), id);

        let payload = self.relations.download(&id).await?;
        let path = self
            .scratch
            .write(&id, &token, RELATIONS, suffix, &payload)
            .await
            .map_err(LoadError::Scratch)?;

        // Scratch cleanup must run whether conversion succeeds or not
        let outcome = self.convert_with_relations(&id, &path).await;
        self.scratch.remove(&path).await;
        outcome
    }
}

/// Pipeline with relations and tags side channels fetched concurrently.
///
/// Both auxiliary fetches must complete before the primary download runs;
/// the first failure wins and no partial-result path exists.
pub struct ParallelStagedLoader {
    config: Arc<dyn ProviderConfig>,
    downloader: Arc<dyn Downloader>,
    relations: Arc<dyn Downloader>,
    tags: Arc<dyn Downloader>,
    converter: Arc<dyn Converter>,
    scratch: Arc<ScratchSpace>,
}

impl ParallelStagedLoader {
    pub fn new(
        config: Arc<dyn ProviderConfig>,
        downloader: Arc<dyn Downloader>,
        relations: Arc<dyn Downloader>,
        tags: Arc<dyn Downloader>,
        converter: Arc<dyn Converter>,
        scratch: Arc<ScratchSpace>,
    ) -> Self {
        Self {
            config,
            downloader,
            relations,
            tags,
            converter,
            scratch,
        }
    }

    async fn stage(
        &self,
        fetcher: &Arc<dyn Downloader>,
        id: &AnimeId,
        token: &str,
        kind: &str,
    ) -> Result<()> {
        let payload = fetcher.download(id).await?;
        self.scratch
            .write(id, token, kind, self.config.file_suffix(), &payload)
            .await
            .map_err(LoadError::Scratch)?;
        Ok(())
    }

    async fn run_pipeline(
        &self,
        id: &AnimeId,
        token: &str,
        relations: &Path,
        tags: &Path,
    ) -> Result<Anime> {
        // Fan-out both side channels, join before the primary step
        futures::try_join!(
            self.stage(&self.relations, id, token, RELATIONS),
            self.stage(&self.tags, id, token, TAGS),
        )?;

        let raw = self.downloader.download(id).await?;
        Ok(self
            .converter
            .convert(&raw, AuxPayloads::with_relations_and_tags(relations, tags))
            .await?)
    }
}

#[async_trait]
impl CacheLoader for ParallelStagedLoader {
    fn hostname(&self) -> &str {
        self.config.hostname()
    }

    async fn load_anime(&self, uri: &Url) -> Result<Anime> {
        let id = self.config.extract_anime_id(uri)?;
        let token = fresh_token();
        let suffix = self.config.file_suffix();
        tracing::debug!("Loading {} entry {} (parallel staged)", self.hostname(), id);

        let relations_path = self.scratch.path_for(&id, &token, RELATIONS, suffix);
        let tags_path = self.scratch.path_for(&id, &token, TAGS, suffix);

        // Both files are removed regardless of which stage failed; remove()
        // ignores files a failed fan-out never wrote
        let outcome = self
            .run_pipeline(&id, &token, &relations_path, &tags_path)
            .await;
        self.scratch.remove(&relations_path).await;
        self.scratch.remove(&tags_path).await;
        outcome
    }
}
