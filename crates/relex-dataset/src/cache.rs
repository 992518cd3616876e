//! On-disk cache for expensive per-corpus stages.
//!
//! An entry is keyed by the corpus contents, the stage name and a settings
//! string describing everything else the stage depends on. Changing any of
//! them selects a different file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use relex_core::persist;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

const EXTENSION: &str = "json.gz";
/// Hex digits of the key kept in file names.
const KEY_LEN: usize = 16;

/// Cache entries for one corpus file, stored as `<name>.<kind>-<key>.json.gz`.
#[derive(Debug, Clone)]
pub struct StageCache {
    dir: Option<PathBuf>,
    stem: String,
    corpus_digest: String,
    refresh: bool,
}

impl StageCache {
    /// A cache that always recomputes.
    pub fn disabled() -> Self {
        Self {
            dir: None,
            stem: String::new(),
            corpus_digest: String::new(),
            refresh: false,
        }
    }

    /// Cache for the corpus at `corpus_path`, under `dir`.
    ///
    /// The corpus file is hashed so that entries never outlive an edit to it
    /// and two corpora with the same file name never share entries.
    pub fn for_corpus(dir: Option<&Path>, corpus_path: &Path, refresh: bool) -> Result<Self> {
        let Some(dir) = dir else {
            return Ok(Self::disabled());
        };

        let contents = fs::read(corpus_path)
            .with_context(|| format!("failed to read corpus {}", corpus_path.display()))?;
        let stem = corpus_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".into());

        Ok(Self {
            dir: Some(dir.to_path_buf()),
            stem,
            corpus_digest: format!("{:x}", Sha256::digest(&contents)),
            refresh,
        })
    }

    fn key(&self, kind: &str, settings: &str) -> String {
        let mut hasher = Sha256::new();
        for part in [self.corpus_digest.as_str(), kind, settings] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        let mut key = format!("{:x}", hasher.finalize());
        key.truncate(KEY_LEN);
        key
    }

    /// File backing the `kind` entry built under `settings`, if caching is
    /// enabled.
    pub fn entry_path(&self, kind: &str, settings: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| {
            let key = self.key(kind, settings);
            dir.join(format!("{}.{kind}-{key}.{EXTENSION}", self.stem))
        })
    }

    /// Load the `kind` entry built under `settings`, or compute and store it.
    ///
    /// Unreadable entries are recomputed.
    pub fn get_or_compute<T, F>(&self, kind: &str, settings: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        let Some(path) = self.entry_path(kind, settings) else {
            return compute();
        };

        if !self.refresh && path.exists() {
            match persist::load(&path) {
                Ok(value) => {
                    info!(path = %path.display(), "using cached {kind}");
                    return Ok(value);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "discarding unreadable cache entry"),
            }
        }

        let value = compute()?;
        persist::save(&value, &path)
            .with_context(|| format!("failed to write cache entry {}", path.display()))?;
        Ok(value)
    }
}
