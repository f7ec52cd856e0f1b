//! # anicache - Concurrent anime metadata cache
//!
//! This crate is the core of the metadata aggregation layer: a lazily
//! populated, write-once cache of canonical anime records keyed by provider
//! URI, with provider-specific multi-stage fetch pipelines behind it.
//!
//! ## Overview
//!
//! - One logical record is addressable by several keys (one URI per provider
//!   that describes the same title). Resolving any one of them caches all of
//!   them (aliasing).
//! - Remote faults and provider-reported dead ids collapse into permanent
//!   `Dead` tombstones for the requested key only; callers only ever see
//!   `Present` or `Dead`, never an error.
//! - Reads hand out host-scoped projections, never the stored record.
//!
//! ## Architecture
//!
//! ```text
//! anicache
//!     ├── entry.rs    - CacheEntry (Present | Dead)
//!     ├── loader.rs   - the three pipeline shapes
//!     ├── scratch.rs  - side-channel files for staged pipelines
//!     ├── registry.rs - host-to-loader resolution
//!     ├── cache.rs    - AnimeCache orchestration
//!     └── settings.rs - YAML-backed configuration
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use anicache::{AnimeCache, CacheEntry, SimpleLoader};
//! use std::sync::Arc;
//! use url::Url;
//!
//! # async fn demo(downloader: Arc<dyn anisource::Downloader>,
//! #               converter: Arc<dyn anisource::Converter>) {
//! let loader = SimpleLoader::new(
//!     Arc::new(anisource::myanimelist()),
//!     downloader,
//!     converter,
//! );
//! let cache = Arc::new(AnimeCache::new(vec![Arc::new(loader)]));
//!
//! let key = Url::parse("https://myanimelist.net/anime/1535").unwrap();
//! match cache.fetch(&key).await {
//!     CacheEntry::Present(record) => println!("{}", record.title),
//!     CacheEntry::Dead => println!("entry is gone"),
//! }
//! # }
//! ```

pub mod cache;
pub mod entry;
pub mod error;
pub mod loader;
pub mod registry;
pub mod scratch;
pub mod settings;

pub use cache::AnimeCache;
pub use entry::CacheEntry;
pub use error::{LoadError, Result};
pub use loader::{CacheLoader, ParallelStagedLoader, SimpleLoader, StagedLoader};
pub use registry::LoaderRegistry;
pub use scratch::ScratchSpace;
pub use settings::CacheSettings;
