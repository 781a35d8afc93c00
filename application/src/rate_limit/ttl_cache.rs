//! Short-TTL key/value cache
//!
//! Entries expire `ttl` after insertion on the tokio clock. A zero TTL turns
//! the cache into a pass-through.

use super::lock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`; expired entries are evicted on the way
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = lock(&self.entries);
        let fresh = entries.get(key)?.stored_at.elapsed() < self.ttl;
        if fresh {
            entries.get(key).map(|e| e.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: K, value: V) {
        lock(&self.entries).insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Insert only if `still_current` holds while the cache is locked
    ///
    /// Returns whether the value was stored.
    pub fn insert_if(&self, key: K, value: V, still_current: impl FnOnce() -> bool) -> bool {
        let mut entries = lock(&self.entries);
        if !still_current() {
            return false;
        }
        entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every entry whose key matches
    pub fn invalidate_where(&self, mut predicate: impl FnMut(&K) -> bool) {
        lock(&self.entries).retain(|k, _| !predicate(k));
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_then_expire() {
        let cache = TtlCache::new(Duration::from_secs(2));
        cache.insert("s1", 10);

        tokio::time::advance(Duration::from_millis(1_999)).await;
        assert_eq!(cache.get(&"s1"), Some(10));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get(&"s1"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_hits() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("s1", 1);
        assert_eq!(cache.get(&"s1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_if_rejected_leaves_entry_out() {
        let cache = TtlCache::new(Duration::from_secs(2));
        assert!(!cache.insert_if("s1", 1, || false));
        assert!(cache.is_empty());

        assert!(cache.insert_if("s1", 2, || true));
        assert_eq!(cache.get(&"s1"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_where() {
        let cache = TtlCache::new(Duration::from_secs(2));
        cache.insert(("s1", 1), "a");
        cache.insert(("s1", 2), "b");
        cache.insert(("s2", 1), "c");

        cache.invalidate_where(|(session, _)| *session == "s1");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&("s2", 1)), Some("c"));
    }
}
