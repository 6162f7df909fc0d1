//! Pool of scratch aggregation maps
//!
//! Reducing many partial facets accumulates counts per distinct term in a hash
//! map. Under heavy aggregation load those maps are reused rather than
//! allocated for every reduction.
//!
//! Maps are lent out through [`PooledCountMap`], an RAII guard that returns the
//! map when dropped, so a map is released on every exit path including early
//! returns and panics. Maps are cleared when acquired; a released map keeps its
//! stale contents until the next acquisition.

use crate::config::ScratchPoolConfig;
use crate::entry::RankedEntry;
use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Accumulator keyed by term bit pattern
pub type CountMap = FxHashMap<u64, u64>;

/// Statistics for scratch pool operations
#[derive(Debug, Default)]
pub struct PoolStatistics {
    /// Number of acquisitions served from the pool
    pub pool_hits: AtomicU64,
    /// Number of acquisitions that allocated a new map
    pub pool_misses: AtomicU64,
    /// Number of maps returned to the pool
    pub returns: AtomicU64,
    /// Number of maps discarded on release (too large or pool full)
    pub discards: AtomicU64,
    /// Number of maps preallocated by prewarming
    pub prewarmed: AtomicU64,
    /// Peak number of idle maps held simultaneously
    pub peak_pool_size: AtomicU64,
}

impl PoolStatistics {
    fn record_pool_hit(&self) {
        self.pool_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_pool_miss(&self) {
        self.pool_misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }

    fn record_discard(&self) {
        self.discards.fetch_add(1, Ordering::Relaxed);
    }

    fn record_prewarm(&self, count: usize) {
        self.prewarmed.fetch_add(count as u64, Ordering::Relaxed);
    }

    fn update_peak_pool_size(&self, current_size: usize) {
        self.peak_pool_size.fetch_max(current_size as u64, Ordering::Relaxed);
    }

    /// Fraction of acquisitions served from the pool
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.pool_hits.load(Ordering::Relaxed);
        let total = self.total_requests();

        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Total acquisitions served
    pub fn total_requests(&self) -> u64 {
        self.pool_hits.load(Ordering::Relaxed) + self.pool_misses.load(Ordering::Relaxed)
    }
}

/// Idle map waiting in the pool
#[derive(Debug)]
struct IdleMap {
    map: CountMap,
    released_at: Instant,
}

/// Shared state behind the pool and its guards
#[derive(Debug)]
struct PoolShared {
    idle: Mutex<VecDeque<IdleMap>>,
    config: ScratchPoolConfig,
    stats: PoolStatistics,
}

impl PoolShared {
    fn give_back(&self, map: CountMap) {
        if map.capacity() > self.config.max_map_capacity {
            self.stats.record_discard();
            return;
        }

        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_pool_size {
            idle.push_back(IdleMap {
                map,
                released_at: Instant::now(),
            });
            self.stats.record_return();
            self.stats.update_peak_pool_size(idle.len());
        } else {
            self.stats.record_discard();
        }
    }
}

/// Thread-safe pool lending empty count maps
///
/// The pool is an ordinary owned value: share it between reducers with an
/// `Arc`. Each acquired map is exclusively owned by its guard.
#[derive(Debug, Clone)]
pub struct ScratchMapPool {
    shared: Arc<PoolShared>,
}

impl ScratchMapPool {
    /// Create a pool with default configuration
    pub fn new() -> Self {
        Self::with_config(ScratchPoolConfig::default())
    }

    /// Create a pool with custom configuration
    pub fn with_config(config: ScratchPoolConfig) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                idle: Mutex::new(VecDeque::new()),
                config,
                stats: PoolStatistics::default(),
            }),
        }
    }

    /// Acquire an empty map, reusing an idle one when available
    pub fn acquire(&self) -> PooledCountMap {
        let reused = self.shared.idle.lock().pop_back();

        let map = match reused {
            Some(IdleMap { mut map, .. }) => {
                map.clear();
                self.shared.stats.record_pool_hit();
                tracing::trace!(capacity = map.capacity(), "Reusing pooled scratch map");
                map
            }
            None => {
                self.shared.stats.record_pool_miss();
                tracing::trace!("Allocating new scratch map");
                CountMap::with_capacity_and_hasher(self.shared.config.initial_capacity, FxBuildHasher)
            }
        };

        PooledCountMap {
            map,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Return a map to the pool
    ///
    /// Equivalent to dropping the guard.
    pub fn release(&self, map: PooledCountMap) {
        drop(map);
    }

    /// Pre-allocate idle maps
    pub fn prewarm(&self, count: usize) {
        let mut idle = self.shared.idle.lock();
        let mut added = 0;

        while added < count && idle.len() < self.shared.config.max_pool_size {
            idle.push_back(IdleMap {
                map: CountMap::with_capacity_and_hasher(self.shared.config.initial_capacity, FxBuildHasher),
                released_at: Instant::now(),
            });
            added += 1;
        }

        self.shared.stats.update_peak_pool_size(idle.len());
        self.shared.stats.record_prewarm(added);
    }

    /// Drop idle maps older than the configured maximum idle time
    pub fn cleanup_expired(&self) {
        let max_idle = self.shared.config.max_idle;
        self.shared
            .idle
            .lock()
            .retain(|entry| entry.released_at.elapsed() <= max_idle);
    }

    /// Number of idle maps currently held
    pub fn pool_size(&self) -> usize {
        self.shared.idle.lock().len()
    }

    /// Drop all idle maps (statistics are kept)
    pub fn clear(&self) {
        self.shared.idle.lock().clear();
    }

    /// Pool statistics
    pub fn statistics(&self) -> &PoolStatistics {
        &self.shared.stats
    }

    /// Pool configuration
    pub fn config(&self) -> &ScratchPoolConfig {
        &self.shared.config
    }
}

impl Default for ScratchMapPool {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard over a pooled count map
///
/// The map goes back to its pool when the guard is dropped.
#[derive(Debug)]
pub struct PooledCountMap {
    map: CountMap,
    shared: Arc<PoolShared>,
}

impl PooledCountMap {
    /// Add `count` occurrences of an entry's term
    pub fn add(&mut self, entry: &RankedEntry) {
        let slot = self.map.entry(entry.term_key()).or_insert(0);
        *slot = slot.saturating_add(entry.count());
    }

    /// Accumulated count for a term
    pub fn get(&self, value: f64) -> Option<u64> {
        self.map.get(&value.to_bits()).copied()
    }

    /// Iterate `(term, count)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.map.iter().map(|(&bits, &count)| (f64::from_bits(bits), count))
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no terms have been accumulated
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Current capacity of the backing map
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }
}

impl Drop for PooledCountMap {
    fn drop(&mut self) {
        // An empty FxHashMap does not allocate
        self.shared.give_back(std::mem::take(&mut self.map));
    }
}
