//! Cache configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for one cache instance.
///
/// Loaded from a YAML file or built from defaults. Only the scratch
/// directory is configurable: the store itself is in-memory by design.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory for auxiliary-payload scratch files.
    pub scratch_dir: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("anicache"),
        }
    }
}

impl CacheSettings {
    /// Loads settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read settings file {}", path.display()))?;
        let settings = serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings)
    }
}
