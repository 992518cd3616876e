//! Run configuration for dataset builds.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relex_core::ExtractorConfig;
use serde::{Deserialize, Serialize};

/// Default cache location: `<data_dir>/relex/cache`.
pub fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("relex")
        .join("cache")
}

/// Settings for one feature-file build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub extractor: ExtractorConfig,
    /// Where tagged corpora and path indices are cached; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Ignore existing cache entries and recompute them.
    pub refresh_cache: bool,
    /// Only emit candidates from sentences named in the annotation file.
    pub annotated_only: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            cache_dir: Some(default_cache_dir()),
            refresh_cache: false,
            annotated_only: true,
        }
    }
}

impl DatasetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.extractor.validate()?;
        Ok(config)
    }

    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Disable on-disk caching.
    pub fn without_cache(mut self) -> Self {
        self.cache_dir = None;
        self
    }

    pub fn with_refresh_cache(mut self, refresh: bool) -> Self {
        self.refresh_cache = refresh;
        self
    }

    /// Emit candidates from every corpus sentence when `false`.
    pub fn with_annotated_only(mut self, annotated_only: bool) -> Self {
        self.annotated_only = annotated_only;
        self
    }
}
