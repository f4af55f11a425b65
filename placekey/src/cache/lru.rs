//! Least-recently-used cache.

use super::CacheStats;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;

#[derive(Debug)]
struct Inner<K: Hash + Eq, V> {
    entries: ::lru::LruCache<K, V>,
    stats: CacheStats,
}

/// Thread-safe, fixed-capacity LRU cache.
///
/// Wraps an `lru::LruCache` in a single lock and counts hits, misses and
/// evictions around it.
///
/// # Example
///
/// ```
/// use placekey::cache::LruCache;
///
/// let cache = LruCache::new(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get(&"a");
/// cache.set("c", 3);
///
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// ```
#[derive(Debug)]
pub struct LruCache<K: Hash + Eq, V> {
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero yields a cache that never stores anything.
    pub fn new(capacity: usize) -> Self {
        let bound = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: ::lru::LruCache::new(bound),
                stats: CacheStats::new(),
            }),
        }
    }

    /// Get a cached value, marking it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;

        let value = inner.entries.get(key).cloned();
        if value.is_some() {
            inner.stats.record_hit();
        } else {
            inner.stats.record_miss();
        }
        value
    }

    /// Insert or replace a value, marking it most recently used.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry first.
    pub fn set(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;

        let evicts = !inner.entries.contains(&key) && inner.entries.len() >= self.capacity;
        inner.entries.put(key, value);
        if evicts {
            inner.stats.record_eviction();
        }
    }

    /// Check if a key is cached without changing its recency.
    pub fn contains(&self, key: &K) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.entries.contains(key)
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
    }

    /// Get the current number of entries.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the cached keys, least recently used first.
    pub fn keys(&self) -> Vec<K> {
        let inner = self.inner.lock().unwrap();
        inner.entries.iter().rev().map(|(key, _)| key.clone()).collect()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        let mut stats = inner.stats.clone();
        stats.entry_count = inner.entries.len();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_cache_is_empty() {
        let cache: LruCache<String, u32> = LruCache::new(3);
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn test_set_and_get() {
        let cache = LruCache::new(3);
        cache.set("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let cache = LruCache::new(3);
        cache.set("a", 1);
        cache.set("a", 2);
        assert_eq!(cache.get(&"a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_promotes() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.get(&"a");
        cache.set("c", 3);

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
    }

    #[test]
    fn test_contains_does_not_promote() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.contains(&"a"));
        cache.set("c", 3);

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
    }

    #[test]
    fn test_updating_existing_key_does_not_evict() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.keys(), vec!["b", "a"]);
    }

    #[test]
    fn test_keys_in_recency_order() {
        let cache = LruCache::new(3);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        cache.get(&"a");

        assert_eq!(cache.keys(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_clear() {
        let cache = LruCache::new(3);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.keys().is_empty());
        assert!(!cache.contains(&"a"));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = LruCache::new(0);
        cache.set("a", 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_track_hits_misses_and_evictions() {
        let cache = LruCache::new(1);
        cache.set("a", 1);
        cache.get(&"a");
        cache.get(&"b");
        cache.set("b", 2);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.entry_count, 1);
    }

    #[test]
    fn test_get_miss_does_not_disturb_order() {
        let cache = LruCache::new(3);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get(&"z"), None);

        assert_eq!(cache.keys(), vec!["a", "b"]);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_replacing_in_full_cache_is_not_an_eviction() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("b", 3);

        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_access_respects_capacity() {
        let cache = Arc::new(LruCache::new(50));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(t * 1000 + i, i);
                        cache.get(&(t * 1000 + i / 2));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 50);
        assert_eq!(cache.keys().len(), 50);
    }
}
