//! Bounded FIFO cache with an optional replacement policy

use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

/// Decides whether `new` may overwrite `old` for an existing key
pub type ReplacePredicate<V> = fn(old: &V, new: &V) -> bool;

/// Snapshot of the cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub updates: u64,
}

impl CacheMetrics {
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Fixed-capacity map evicting the oldest insertion first.
///
/// Lookups take `&self` and only touch atomic counters, so a cache behind a
/// read-write lock can be looked up under the read lock.
#[derive(Debug)]
pub struct FixedCache<K, V> {
    capacity: usize,
    entries: FxHashMap<K, V>,
    order: VecDeque<K>,
    replace: Option<ReplacePredicate<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    updates: AtomicU64,
}

impl<K, V> FixedCache<K, V>
where
    K: Copy + Eq + Hash,
    V: Clone,
{
    /// A capacity of zero is bumped to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            replace: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
            updates: AtomicU64::new(0),
        }
    }

    pub fn with_replace_predicate(capacity: usize, replace: ReplacePredicate<V>) -> Self {
        Self {
            replace: Some(replace),
            ..Self::new(capacity)
        }
    }

    pub fn try_lookup(&self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or update an entry.
    ///
    /// Updates of an existing key keep its FIFO slot and are subject to the
    /// replacement predicate; returns whether the value was written.
    pub fn store(&mut self, key: K, value: V) -> bool {
        if let Some(existing) = self.entries.get_mut(&key) {
            if self.replace.is_some_and(|replace| !replace(existing, &value)) {
                return false;
            }
            *existing = value;
            self.updates.fetch_add(1, Ordering::Relaxed);
            return true;
        }

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }

        self.entries.insert(key, value);
        self.order.push_back(key);
        self.stores.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Drop all entries and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        for counter in [&self.hits, &self.misses, &self.stores, &self.updates] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fill ratio in `[0, 1]`
    pub fn usage(&self) -> f64 {
        self.entries.len() as f64 / self.capacity as f64
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
        }
    }
}
