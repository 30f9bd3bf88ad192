use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Utc;
use quarry_utils::{
    error::FileSystemError,
    fs::{ensure_dir_exists, remove_stale_files, safe_remove},
    hash::hash_str,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{CacheError, Result};

/// Files untouched for this long are removed when a cache is opened, whatever their expiry.
pub const STALE_AFTER: Duration = Duration::from_secs(12 * 60 * 60);

const EXTENSION: &str = "cache";

/// On-disk record: the payload and the unix time (seconds) after which it is stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub expiry: i64,
}

impl<T> CacheEntry<T> {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expiry
    }
}

/// A directory of TTL-bound query results.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
    ttl_secs: u64,
}

impl ResultCache {
    /// Opens the cache rooted at `dir`, creating the directory if needed and sweeping files
    /// older than [`STALE_AFTER`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Directory`] if the directory cannot be created or is a file.
    pub fn new<P: AsRef<Path>>(dir: P, ttl_secs: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        ensure_dir_exists(&dir).map_err(|source| {
            CacheError::Directory {
                path: dir.clone(),
                source,
            }
        })?;

        let cache = Self { dir, ttl_secs };
        match cache.sweep() {
            Ok(0) => {}
            Ok(removed) => debug!("swept {} stale cache entries", removed),
            Err(err) => warn!("cache sweep failed: {}", err),
        }

        Ok(cache)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// File backing the entry for `sql`.
    pub fn key_path(&self, sql: &str) -> PathBuf {
        self.dir.join(format!("{}.{EXTENSION}", hash_str(sql)))
    }

    /// Looks up the payload stored for `sql`.
    ///
    /// Missing and undecodable entries are misses. An expired entry is deleted and reported
    /// as a miss.
    pub fn get<T: DeserializeOwned>(&self, sql: &str) -> Option<T> {
        let path = self.key_path(sql);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                trace!("cache miss: {}", path.display());
                return None;
            }
        };

        let entry: CacheEntry<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                debug!("ignoring undecodable cache entry {}: {}", path.display(), err);
                return None;
            }
        };

        if entry.is_expired_at(Utc::now().timestamp()) {
            debug!("cache entry expired: {}", path.display());
            if let Err(err) = safe_remove(&path) {
                warn!("failed to remove expired cache entry: {}", err);
            }
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => {
                debug!("cache hit: {}", path.display());
                Some(data)
            }
            Err(err) => {
                debug!("cache payload shape mismatch {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Stores `data` for `sql`, replacing any previous entry. The entry expires `ttl_secs`
    /// from now.
    pub fn set<T: Serialize>(&self, sql: &str, data: &T) -> Result<()> {
        let expiry = Utc::now()
            .timestamp()
            .saturating_add(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX));
        let encoded = serde_json::to_string(&CacheEntry { data, expiry })?;

        let path = self.key_path(sql);
        fs::write(&path, encoded).map_err(|source| CacheError::Write { path, source })
    }

    /// Removes entries whose files have not been touched for [`STALE_AFTER`].
    pub fn sweep(&self) -> Result<usize> {
        Ok(remove_stale_files(&self.dir, STALE_AFTER)?)
    }

    /// Removes every entry regardless of age.
    pub fn clear(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|source| {
            CacheError::FileSystem(FileSystemError::Directory {
                path: self.dir.clone(),
                action: "read",
                source,
            })
        })?;

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                safe_remove(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
