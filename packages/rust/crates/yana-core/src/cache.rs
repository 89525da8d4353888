//! Path cache: the flat, ordered list of note paths from the previous run.
//!
//! On disk this is a JSON array of absolute path strings. The cache is read
//! once at the start of a run and overwritten once at the end of a completed
//! run; nothing else touches the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::dirs::YanaDirs;
use crate::error::CacheError;
use crate::persistence::atomic_write_text;

/// File name of the cache inside the cache home.
pub const CACHE_FILE_NAME: &str = "list_cache.json";

/// Reads and writes the previous run's note paths.
#[derive(Debug, Clone)]
pub struct PathCache {
    path: PathBuf,
}

impl PathCache {
    /// Cache backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<cache home>/list_cache.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        YanaDirs::cache_home().join(CACHE_FILE_NAME)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached paths.
    ///
    /// Never fails: a missing file yields an empty list; malformed content,
    /// invalid UTF-8 included, is deleted and yields an empty list. Entries that no longer point at
    /// an existing file and repeated entries are dropped, order preserved.
    #[must_use]
    pub fn load(&self) -> Vec<String> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no path cache yet");
                return Vec::new();
            }
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %error,
                    "failed to read path cache; starting empty"
                );
                return Vec::new();
            }
        };

        let paths = match serde_json::from_slice::<Option<Vec<String>>>(&raw) {
            Ok(paths) => paths.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %error,
                    "path cache is corrupt; removing it"
                );
                if let Err(error) = std::fs::remove_file(&self.path) {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %error,
                        "failed to remove corrupt path cache"
                    );
                }
                return Vec::new();
            }
        };

        let total = paths.len();
        let mut seen = HashSet::with_capacity(total);
        let valid: Vec<String> = paths
            .into_iter()
            .filter(|p| Path::new(p).is_file())
            .filter(|p| seen.insert(p.clone()))
            .collect();
        tracing::debug!(
            loaded = valid.len(),
            dropped = total - valid.len(),
            "loaded paths from previous run"
        );
        valid
    }

    /// Overwrite the cache with `paths`, in order.
    ///
    /// # Errors
    /// Returns [`CacheError`] when serialization or the atomic write fails.
    pub fn save(&self, paths: &[String]) -> Result<(), CacheError> {
        let payload = serde_json::to_string(paths)?;
        atomic_write_text(&self.path, &payload).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            count = paths.len(),
            "saved path cache"
        );
        Ok(())
    }
}
