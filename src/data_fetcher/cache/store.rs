//! Cache store abstraction and the in-memory implementation

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::types::{CacheEntry, CacheSnapshot, Namespace};

/// Key -> (value, timestamp) storage shared by the team resolver and the event retriever.
///
/// Implementations must stamp `put` with the current time. Writers are
/// serialized so concurrent lookups cannot lose updates.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, namespace: Namespace, key: &str) -> Option<CacheEntry<Value>>;

    async fn put(&self, namespace: Namespace, key: &str, value: Value);
}

/// Returns the cached value only while it is younger than `ttl`.
pub async fn get_fresh(
    store: &dyn CacheStore,
    namespace: Namespace,
    key: &str,
    ttl: Duration,
) -> Option<Value> {
    let entry = store.get(namespace, key).await?;
    let now = Utc::now();
    if entry.is_fresh(now, ttl) {
        debug!(
            "Cache hit: namespace={}, key={}, age={}s",
            namespace,
            key,
            entry.age(now).num_seconds()
        );
        Some(entry.value)
    } else {
        debug!(
            "Cache entry expired: namespace={}, key={}, age={}s, ttl={:?}",
            namespace,
            key,
            entry.age(now).num_seconds(),
            ttl
        );
        None
    }
}

/// In-process store without persistence.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    snapshot: Mutex<CacheSnapshot>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entry with an explicit timestamp.
    pub async fn insert_entry(&self, namespace: Namespace, key: &str, entry: CacheEntry<Value>) {
        self.snapshot.lock().await.insert(namespace, key, entry);
    }

    pub async fn len(&self, namespace: Namespace) -> usize {
        self.snapshot.lock().await.len(namespace)
    }

    pub async fn snapshot(&self) -> CacheSnapshot {
        self.snapshot.lock().await.clone()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, namespace: Namespace, key: &str) -> Option<CacheEntry<Value>> {
        self.snapshot.lock().await.get(namespace, key)
    }

    async fn put(&self, namespace: Namespace, key: &str, value: Value) {
        trace!("Memory cache put: namespace={}, key={}", namespace, key);
        self.snapshot
            .lock()
            .await
            .insert(namespace, key, CacheEntry::new(value, Utc::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_then_get_fresh() {
        let store = MemoryCacheStore::new();
        store
            .put(Namespace::TeamIds, "new york knicks", json!("134862"))
            .await;

        let value = get_fresh(
            &store,
            Namespace::TeamIds,
            "new york knicks",
            Duration::from_secs(60),
        )
        .await;
        assert_eq!(value, Some(json!("134862")));
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let store = MemoryCacheStore::new();
        store.put(Namespace::Events, "last:1", json!({})).await;

        assert!(store.get(Namespace::TeamIds, "last:1").await.is_none());
        assert_eq!(store.len(Namespace::Events).await, 1);
        assert_eq!(store.len(Namespace::TeamIds).await, 0);
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_returned() {
        let store = MemoryCacheStore::new();
        let stale = Utc::now() - chrono::Duration::minutes(20);
        store
            .insert_entry(
                Namespace::Events,
                "next:134862",
                CacheEntry::new(json!({ "events": [] }), stale),
            )
            .await;

        let ttl = Duration::from_secs(15 * 60);
        assert!(
            get_fresh(&store, Namespace::Events, "next:134862", ttl)
                .await
                .is_none()
        );
        // The stale entry is still there for inspection
        assert!(store.get(Namespace::Events, "next:134862").await.is_some());
    }
}
