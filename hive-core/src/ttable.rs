//! Transposition table shared between search workers

use parking_lot::RwLock;

use crate::board::Move;
use crate::cache::{CacheMetrics, FixedCache};

/// Number of bytes in a megabyte
const BYTES_IN_MB: usize = 1024 * 1024;

/// Fraction of the byte budget spent on entries; the rest covers map overhead
const FILL_FACTOR: f64 = 0.9;

/// How a stored value relates to the true negamax value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Exact,
    /// The true value is at least `value` (beta cutoff)
    LowerBound,
    /// The true value is at most `value` (failed low)
    UpperBound,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TTEntry {
    pub kind: EntryKind,
    pub value: f64,
    pub depth: u32,
    pub best_move: Option<Move>,
}

impl TTEntry {
    /// Classify `value` against the window the node was searched with
    pub fn new(value: f64, alpha: f64, beta: f64, depth: u32, best_move: Option<Move>) -> Self {
        let kind = if value <= alpha {
            EntryKind::UpperBound
        } else if value >= beta {
            EntryKind::LowerBound
        } else {
            EntryKind::Exact
        };
        Self {
            kind,
            value,
            depth,
            best_move: (kind != EntryKind::UpperBound).then_some(best_move).flatten(),
        }
    }
}

/// Only deeper results overwrite an existing entry
fn deeper_entry(old: &TTEntry, new: &TTEntry) -> bool {
    new.depth > old.depth
}

/// Zobrist-keyed search results behind a read-write lock
#[derive(Debug)]
pub struct TranspositionTable {
    size_mb: usize,
    cache: RwLock<FixedCache<u64, TTEntry>>,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        Self {
            size_mb,
            cache: RwLock::new(FixedCache::with_replace_predicate(
                Self::capacity_for(size_mb),
                deeper_entry,
            )),
        }
    }

    /// Entry count that fits in a byte budget
    pub fn capacity_for(size_mb: usize) -> usize {
        // Key stored in both the map and the FIFO queue
        let per_entry = std::mem::size_of::<TTEntry>() + 2 * std::mem::size_of::<u64>();
        let entries = (size_mb * BYTES_IN_MB) / per_entry;
        ((entries as f64 * FILL_FACTOR) as usize).max(1)
    }

    pub fn size_mb(&self) -> usize {
        self.size_mb
    }

    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.cache.read().try_lookup(&key)
    }

    /// Returns whether the entry was written
    pub fn store(&self, key: u64, entry: TTEntry) -> bool {
        self.cache.write().store(key, entry)
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn count(&self) -> usize {
        self.cache.read().count()
    }

    pub fn capacity(&self) -> usize {
        self.cache.read().capacity()
    }

    pub fn usage(&self) -> f64 {
        self.cache.read().usage()
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.cache.read().metrics()
    }
}
