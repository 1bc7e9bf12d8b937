//! Statistics Recording
//!
//! A pluggable strategy for recording cache events. Variants composed with
//! the stats feature hold a [`StatsCounter`]; all others default to the
//! zero-cost [`DisabledStatsCounter`]. Counters are observational only and
//! never affect cache correctness, so recording uses relaxed atomics.
//!
//! # Examples
//!
//! ```
//! use cache_compose::stats::{ConcurrentStatsCounter, StatsCounter};
//!
//! let counter = ConcurrentStatsCounter::new();
//! counter.record_hits(2);
//! counter.record_misses(1);
//! let stats = counter.snapshot();
//! assert_eq!(stats.hit_count, 2);
//! assert_eq!(stats.miss_count, 1);
//! ```

use core::sync::atomic::{AtomicU64, Ordering};

/// An immutable snapshot of accumulated cache statistics.
///
/// Snapshots taken under concurrent recording may be internally
/// inconsistent (a hit counted but its load time not yet added); each field
/// individually never goes backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that returned a cached value.
    pub hit_count: u64,
    /// Number of lookups that found no value.
    pub miss_count: u64,
    /// Number of successful value loads.
    pub load_success_count: u64,
    /// Number of failed value loads.
    pub load_failure_count: u64,
    /// Total nanoseconds spent loading values.
    pub total_load_time: u64,
    /// Number of entries evicted by the bounding policy.
    pub eviction_count: u64,
}

impl CacheStats {
    /// Total number of lookups recorded.
    pub fn request_count(&self) -> u64 {
        self.hit_count.saturating_add(self.miss_count)
    }
}

/// Records cache events for later inspection.
///
/// Implementations must tolerate concurrent recording from any thread.
pub trait StatsCounter {
    /// Records `count` cache hits.
    fn record_hits(&self, count: u64);

    /// Records `count` cache misses.
    fn record_misses(&self, count: u64);

    /// Records one successful load taking `load_time` nanoseconds.
    fn record_load_success(&self, load_time: u64);

    /// Records one failed load taking `load_time` nanoseconds.
    fn record_load_failure(&self, load_time: u64);

    /// Records one eviction.
    fn record_eviction(&self);

    /// Returns a snapshot of the accumulated statistics.
    fn snapshot(&self) -> CacheStats;
}

/// A [`StatsCounter`] that records nothing, for variants composed without
/// the stats feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisabledStatsCounter;

impl StatsCounter for DisabledStatsCounter {
    fn record_hits(&self, _count: u64) {}

    fn record_misses(&self, _count: u64) {}

    fn record_load_success(&self, _load_time: u64) {}

    fn record_load_failure(&self, _load_time: u64) {}

    fn record_eviction(&self) {}

    fn snapshot(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// A thread-safe [`StatsCounter`] using relaxed atomic additions.
///
/// Unlike the single-writer cells in [`relaxed`](crate::relaxed), stats are
/// recorded by many threads at once, so each field is a fetch-add counter.
/// Relaxed ordering is sufficient: totals are eventually visible and no
/// other memory access synchronizes on them.
#[derive(Debug, Default)]
pub struct ConcurrentStatsCounter {
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    load_success_count: AtomicU64,
    load_failure_count: AtomicU64,
    total_load_time: AtomicU64,
    eviction_count: AtomicU64,
}

impl ConcurrentStatsCounter {
    /// Creates a counter with all totals at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsCounter for ConcurrentStatsCounter {
    fn record_hits(&self, count: u64) {
        self.hit_count.fetch_add(count, Ordering::Relaxed);
    }

    fn record_misses(&self, count: u64) {
        self.miss_count.fetch_add(count, Ordering::Relaxed);
    }

    fn record_load_success(&self, load_time: u64) {
        self.load_success_count.fetch_add(1, Ordering::Relaxed);
        self.total_load_time.fetch_add(load_time, Ordering::Relaxed);
    }

    fn record_load_failure(&self, load_time: u64) {
        self.load_failure_count.fetch_add(1, Ordering::Relaxed);
        self.total_load_time.fetch_add(load_time, Ordering::Relaxed);
    }

    fn record_eviction(&self) {
        self.eviction_count.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            load_success_count: self.load_success_count.load(Ordering::Relaxed),
            load_failure_count: self.load_failure_count.load(Ordering::Relaxed),
            total_load_time: self.total_load_time.load(Ordering::Relaxed),
            eviction_count: self.eviction_count.load(Ordering::Relaxed),
        }
    }
}
