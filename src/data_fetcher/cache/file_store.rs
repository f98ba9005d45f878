//! JSON-file backed cache store

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::store::CacheStore;
use super::types::{CacheEntry, CacheSnapshot, Namespace};
use crate::error::AppError;

/// Cache store persisted to a single JSON file.
///
/// The whole file is loaded once and rewritten after every `put`. A missing
/// or unreadable file yields an empty store, and write failures are only
/// logged: the next run simply sees a cache miss.
#[derive(Debug)]
pub struct FileCacheStore {
    path: PathBuf,
    snapshot: Mutex<CacheSnapshot>,
}

impl FileCacheStore {
    /// Loads the store from `path`, discarding unreadable contents.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let snapshot = match read_snapshot(&path).await {
            Ok(Some(snapshot)) => {
                info!(
                    "Loaded provider cache from {}: team_ids={}, events={}",
                    path.display(),
                    snapshot.len(Namespace::TeamIds),
                    snapshot.len(Namespace::Events)
                );
                snapshot
            }
            Ok(None) => {
                debug!("No cache file at {}, starting empty", path.display());
                CacheSnapshot::default()
            }
            Err(e) => {
                warn!("{e}; starting with an empty cache");
                CacheSnapshot::default()
            }
        };

        Self {
            path,
            snapshot: Mutex::new(snapshot),
        }
    }

    async fn persist(&self, snapshot: &CacheSnapshot) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Reads the cache file. `Ok(None)` when there is no file.
pub async fn read_snapshot(path: &Path) -> Result<Option<CacheSnapshot>, AppError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AppError::cache_corruption(
                path.display().to_string(),
                e.to_string(),
            ));
        }
    };

    serde_json::from_str::<CacheSnapshot>(&content)
        .map(Some)
        .map_err(|e| AppError::cache_corruption(path.display().to_string(), e.to_string()))
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, namespace: Namespace, key: &str) -> Option<CacheEntry<Value>> {
        self.snapshot.lock().await.get(namespace, key)
    }

    async fn put(&self, namespace: Namespace, key: &str, value: Value) {
        // Held across the write so file contents follow the in-memory order of puts
        let mut snapshot = self.snapshot.lock().await;
        snapshot.insert(namespace, key, CacheEntry::new(value, Utc::now()));
        if let Err(e) = self.persist(&snapshot).await {
            warn!(
                "Failed to persist cache to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
