//! Bounded key/value caches shared by the pipeline components.
//!
//! Every component that memoizes results (batcher, scorer, day search,
//! street loader) owns its own `LruCache` instance; nothing is shared
//! globally. Eviction is size-bounded least-recently-used, with an
//! optional age window for caches whose data can go stale.

use std::time::{Duration, Instant};

use hashbrown::HashMap;

struct Entry<V> {
    value: V,
    inserted: Instant,
    last_used: u64,
}

/// Size-bounded LRU cache with string keys and an optional validity window.
///
/// `get` refreshes recency and treats entries older than the configured
/// window as absent. `get_stale` ignores the window, which is what the
/// street loader uses to fall back to an expired result when a fetch
/// times out.
pub struct LruCache<V> {
    entries: HashMap<String, Entry<V>>,
    capacity: usize,
    max_age: Option<Duration>,
    tick: u64,
}

impl<V> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(64)),
            capacity,
            max_age: None,
            tick: 0,
        }
    }

    pub fn with_max_age(capacity: usize, max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
            ..Self::new(capacity)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the cached value if present and still within the validity
    /// window, refreshing its recency.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let max_age = self.max_age;
        self.tick += 1;
        let tick = self.tick;

        let entry = self.entries.get_mut(key)?;
        if let Some(window) = max_age
            && entry.inserted.elapsed() > window
        {
            return None;
        }
        entry.last_used = tick;
        Some(&entry.value)
    }

    /// Returns the cached value regardless of its age, refreshing recency.
    pub fn get_stale(&mut self, key: &str) -> Option<&V> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(&entry.value)
    }

    /// Inserts a value, evicting the least-recently-used entry when the
    /// cache is at capacity. A zero-capacity cache stores nothing.
    pub fn insert(&mut self, key: String, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.tick += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
                last_used: self.tick,
            },
        );
    }

    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            log::debug!("Cache evicting {key}");
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut cache = LruCache::new(4);
        cache.insert("a".into(), 1);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn evicts_least_recently_used_first() {
        let mut cache = LruCache::new(2);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        // Touch "a" so "b" becomes the LRU entry
        cache.get("a");
        cache.insert("c".into(), 3);

        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c"), Some(&3));
    }

    #[test]
    fn reinsert_does_not_evict() {
        let mut cache = LruCache::new(2);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.insert("b".into(), 20);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), Some(&20));
    }

    #[test]
    fn expired_entries_are_absent_but_reachable_stale() {
        let mut cache = LruCache::with_max_age(4, Duration::ZERO);
        cache.insert("a".into(), 1);
        // Duration::ZERO means anything already inserted has aged out
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get_stale("a"), Some(&1));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = LruCache::new(0);
        cache.insert("a".into(), 1);
        assert!(cache.is_empty());
    }
}
