//! Scratch files for auxiliary payloads.
//!
//! Staged pipelines persist auxiliary downloads (relations, tags) to disk
//! before the primary conversion step, for parity with very large payloads.
//! File names follow `{id}.{token}.{kind}.{suffix}` where `token` is unique
//! per in-flight call, so concurrent loads of the same id never collide.
//! The loader passes the resulting paths to the converter explicitly and
//! removes them when the pipeline exits, on the failure paths too.

use anisource::AnimeId;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding the scratch files of one cache instance.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    /// Opens (and creates if needed) a scratch directory.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the scratch directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Builds the path of one scratch file.
    ///
    /// Format: `{id}.{token}.{kind}.{suffix}`
    pub fn path_for(&self, id: &AnimeId, token: &str, kind: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.{}.{}", id, token, kind, suffix))
    }

    /// Writes an auxiliary payload and returns its path.
    pub async fn write(
        &self,
        id: &AnimeId,
        token: &str,
        kind: &str,
        suffix: &str,
        payload: &str,
    ) -> io::Result<PathBuf> {
        let path = self.path_for(id, token, kind, suffix);
        tokio::fs::write(&path, payload).await?;
        tracing::debug!("Wrote {} scratch file {}", kind, path.display());
        Ok(path)
    }

    /// Removes a scratch file, ignoring files already gone.
    pub async fn remove(&self, path: &Path) {
        if let Err(err) = tokio::fs::remove_file(path).await {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Unable to remove scratch file {}: {}", path.display(), err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_remove_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(temp_dir.path()).unwrap();

        let id = AnimeId::from("1535");
        let path = scratch
            .write(&id, "token1", "relations", "mal.json", "payload")
            .await
            .unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "payload");

        scratch.remove(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_paths_are_unique_per_token() {
        let temp_dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(temp_dir.path()).unwrap();

        let id = AnimeId::from("1376");
        let first = scratch.path_for(&id, "aaaa", "relations", "kitsu.json");
        let second = scratch.path_for(&id, "bbbb", "relations", "kitsu.json");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_silent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let scratch = ScratchSpace::new(temp_dir.path()).unwrap();
        let path = scratch.path_for(&AnimeId::from("1"), "t", "tags", "kitsu.json");

        // Nothing written, must not panic or error out
        scratch.remove(&path).await;
    }
}
