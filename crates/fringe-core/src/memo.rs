#![forbid(unsafe_code)]

//! Explicit memoization caches.
//!
//! Keys are exact: floating-point inputs are keyed by their bit patterns, so
//! `0.1 + 0.2` and `0.3` are different entries. The parameter space is
//! discretized by control step sizes, which keeps growth in check without a
//! bound. Each simulation instance owns its caches; nothing is global.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Bit-exact key for one `f64`.
#[inline]
pub fn f64_key(value: f64) -> u64 {
    value.to_bits()
}

/// Hit/miss counters for a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache (0 when unused).
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Unbounded key-value memo table with explicit reset.
#[derive(Debug, Clone)]
pub struct MemoCache<K, V> {
    map: FxHashMap<K, V>,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq, V> MemoCache<K, V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a value without touching the counters.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Store a value, returning the previous one if any.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Return the cached value, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        use std::collections::hash_map::Entry;
        match self.map.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                entry.insert(compute())
            }
        }
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with) for fallible
    /// computations. Errors are returned without caching anything.
    pub fn try_get_or_insert_with<E>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        use std::collections::hash_map::Entry;
        match self.map.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                Ok(entry.insert(compute()?))
            }
        }
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop all entries and zero the counters.
    pub fn reset(&mut self) {
        self.map.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.map.len(),
        }
    }
}

impl<K: Hash + Eq, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_once_per_key() {
        let mut cache: MemoCache<u64, f64> = MemoCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_insert_with(f64_key(1.5), || {
                calls += 1;
                2.25
            });
        }
        assert_eq!(calls, 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
        assert!((stats.hit_ratio() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn keys_are_bit_exact() {
        let mut cache: MemoCache<u64, u8> = MemoCache::new();
        cache.insert(f64_key(0.1 + 0.2), 1);
        assert!(cache.get(&f64_key(0.3)).is_none());
        assert_eq!(cache.get(&f64_key(0.1 + 0.2)), Some(&1));
    }

    #[test]
    fn failed_compute_is_not_cached() {
        let mut cache: MemoCache<u8, u8> = MemoCache::new();
        let err: Result<&u8, &str> = cache.try_get_or_insert_with(1, || Err("degenerate"));
        assert_eq!(err, Err("degenerate"));
        assert!(cache.is_empty());
        assert_eq!(cache.try_get_or_insert_with::<()>(1, || Ok(9)), Ok(&9));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reset_clears_entries_and_counters() {
        let mut cache: MemoCache<[u64; 2], u8> = MemoCache::new();
        cache.get_or_insert_with([1, 2], || 3);
        cache.get_or_insert_with([1, 2], || 3);
        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
