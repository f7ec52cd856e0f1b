//! Cache entry type.

use animodel::Anime;
use std::sync::Arc;

/// One cached value: a converted record or a tombstone.
///
/// Entries are immutable once constructed. A `Dead` entry is a permanent
/// negative-cache marker for the one key it is stored under; other provider
/// identities of the same title are not implied dead.
///
/// The record is held behind an `Arc` so that aliasing the same record under
/// every one of its source URIs shares one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Present(Arc<Anime>),
    Dead,
}

impl CacheEntry {
    /// Wraps a freshly converted record.
    pub fn present(record: Anime) -> Self {
        CacheEntry::Present(Arc::new(record))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, CacheEntry::Present(_))
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, CacheEntry::Dead)
    }

    /// Returns the record, if any.
    pub fn record(&self) -> Option<&Arc<Anime>> {
        match self {
            CacheEntry::Present(record) => Some(record),
            CacheEntry::Dead => None,
        }
    }
}
