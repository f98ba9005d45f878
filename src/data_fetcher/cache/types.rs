//! Cache data structures with TTL support

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The two independent key spaces of the provider cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Normalized team search string -> provider team id
    TeamIds,
    /// Query key (`last:<id>`, `next:<id>`, `pastleague:<id>`) -> raw provider payload
    Events,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::TeamIds => write!(f, "team_ids"),
            Namespace::Events => write!(f, "events"),
        }
    }
}

/// A cached value and the instant it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }

    /// A hit iff `now - fetched_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return true;
        };
        now.signed_duration_since(self.fetched_at) < ttl
    }

    /// Gets the age of this entry at `now`
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.fetched_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamIdRecord {
    pub id: Value,
    #[serde(default)]
    pub ts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventsRecord {
    pub data: Value,
    #[serde(default)]
    pub ts: i64,
}

/// Whole-cache contents in the on-disk layout
/// `{team_ids: {name: {id, ts}}, events: {key: {data, ts}}}` with `ts` in epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheSnapshot {
    #[serde(default)]
    pub team_ids: BTreeMap<String, TeamIdRecord>,
    #[serde(default)]
    pub events: BTreeMap<String, EventsRecord>,
}

fn from_epoch(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl CacheSnapshot {
    pub fn get(&self, namespace: Namespace, key: &str) -> Option<CacheEntry<Value>> {
        match namespace {
            Namespace::TeamIds => self
                .team_ids
                .get(key)
                .map(|r| CacheEntry::new(r.id.clone(), from_epoch(r.ts))),
            Namespace::Events => self
                .events
                .get(key)
                .map(|r| CacheEntry::new(r.data.clone(), from_epoch(r.ts))),
        }
    }

    pub fn insert(&mut self, namespace: Namespace, key: &str, entry: CacheEntry<Value>) {
        let ts = entry.fetched_at.timestamp();
        match namespace {
            Namespace::TeamIds => {
                self.team_ids.insert(
                    key.to_string(),
                    TeamIdRecord {
                        id: entry.value,
                        ts,
                    },
                );
            }
            Namespace::Events => {
                self.events.insert(
                    key.to_string(),
                    EventsRecord {
                        data: entry.value,
                        ts,
                    },
                );
            }
        }
    }

    pub fn len(&self, namespace: Namespace) -> usize {
        match namespace {
            Namespace::TeamIds => self.team_ids.len(),
            Namespace::Events => self.events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.team_ids.is_empty() && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_freshness_boundary() {
        let fetched_at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let entry = CacheEntry::new(json!("134862"), fetched_at);
        let ttl = Duration::from_secs(900);

        assert!(entry.is_fresh(fetched_at, ttl));
        assert!(entry.is_fresh(fetched_at + chrono::Duration::seconds(899), ttl));
        // Exactly at the TTL the entry is stale
        assert!(!entry.is_fresh(fetched_at + chrono::Duration::seconds(900), ttl));
        assert!(!entry.is_fresh(fetched_at + chrono::Duration::hours(1), ttl));
    }

    #[test]
    fn test_snapshot_layout_matches_cache_file_format() {
        let mut snapshot = CacheSnapshot::default();
        let at = Utc.timestamp_opt(1_760_860_800, 0).unwrap();
        snapshot.insert(
            Namespace::TeamIds,
            "new york knicks",
            CacheEntry::new(json!("134862"), at),
        );
        snapshot.insert(
            Namespace::Events,
            "last:134862",
            CacheEntry::new(json!({ "results": [] }), at),
        );

        let written = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            written,
            json!({
                "team_ids": { "new york knicks": { "id": "134862", "ts": 1_760_860_800 } },
                "events": { "last:134862": { "data": { "results": [] }, "ts": 1_760_860_800 } }
            })
        );
    }

    #[test]
    fn test_missing_namespace_and_ts_default() {
        let snapshot: CacheSnapshot =
            serde_json::from_value(json!({ "team_ids": { "nets": { "id": "134861" } } })).unwrap();

        assert_eq!(snapshot.len(Namespace::Events), 0);
        let entry = snapshot.get(Namespace::TeamIds, "nets").unwrap();
        assert_eq!(entry.value, json!("134861"));
        assert_eq!(entry.fetched_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(Namespace::TeamIds.to_string(), "team_ids");
        assert_eq!(Namespace::Events.to_string(), "events");
    }
}
